//! HTTP client for the TrackMyClass backend API.
//!
//! The backend owns users, subscriptions and seat history. This crate
//! wraps its JSON endpoints with typed requests and responses.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use trackmyclass_backend::BackendClient;
//! use url::Url;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let base = Url::parse("http://127.0.0.1:5000/")?;
//! let client = BackendClient::new(base, Duration::from_secs(5))?;
//!
//! if let Some(section_id) = client.lookup_section("12345").await? {
//!     let seats = client.section_seats(&section_id).await?;
//!     println!("{} -> {:?}", section_id, seats);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;

pub use client::{BackendClient, Outcome};
pub use error::{BackendError, Result};
