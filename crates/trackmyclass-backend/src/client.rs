//! Typed client for the backend endpoints.

use std::time::Duration;

use reqwest::{Response, StatusCode};
use serde::Serialize;
use tracing::{debug, trace};
use trackmyclass_models::{
    BackendErrorBody, OpenHistory, RawChangeRecord, SectionId, SectionLookup, SectionStatus,
    Subscription, SubscriptionList, XrayData,
};
use url::Url;

use crate::error::{BackendError, Result};

const SUBSCRIBE_FAILED: &str = "Subscription failed";
const UNSUBSCRIBE_FAILED: &str = "Unsubscribe failed";

/// Result of a backend mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The backend accepted the request.
    Accepted,
    /// The backend refused it; carries the backend's explanation.
    Rejected(String),
}

impl Outcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted)
    }
}

#[derive(Serialize)]
struct CreateUserRequest<'a> {
    user_id: &'a str,
    // Field name is part of the backend's contract.
    discord_username: &'a str,
}

#[derive(Serialize)]
struct ClassNumberRequest<'a> {
    class_number: &'a str,
}

#[derive(Serialize)]
struct UserSectionRequest<'a> {
    user_id: &'a str,
    section_id: &'a SectionId,
}

#[derive(Serialize)]
struct UserRequest<'a> {
    user_id: &'a str,
}

/// Client for the backend API.
#[derive(Clone, Debug)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: Url,
}

impl BackendClient {
    /// Create a client for `base_url` with a per-request timeout.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Register a user. `POST /create_user`
    pub async fn create_user(&self, user_id: &str, username: &str) -> Result<Outcome> {
        let body = CreateUserRequest {
            user_id,
            discord_username: username,
        };
        let response = self.post(&["create_user"], &body).await?;

        if response.status() == StatusCode::OK {
            debug!(user_id, "User registered");
            Ok(Outcome::Accepted)
        } else {
            Ok(Outcome::Rejected(response.text().await?))
        }
    }

    /// Resolve a class number to its section ID. `POST /lookup_section_id`
    ///
    /// Returns `None` for any non-200 answer.
    pub async fn lookup_section(&self, class_number: &str) -> Result<Option<SectionId>> {
        let response = self
            .post(&["lookup_section_id"], &ClassNumberRequest { class_number })
            .await?;

        if response.status() != StatusCode::OK {
            debug!(class_number, status = %response.status(), "Section lookup failed");
            return Ok(None);
        }

        let lookup: SectionLookup = response.json().await?;
        Ok(Some(lookup.section_id))
    }

    /// Subscribe a user to a section. `POST /subscribe_user`
    pub async fn subscribe(&self, user_id: &str, section_id: &SectionId) -> Result<Outcome> {
        let body = UserSectionRequest {
            user_id,
            section_id,
        };
        let response = self.post(&["subscribe_user"], &body).await?;
        mutation_outcome(response, SUBSCRIBE_FAILED).await
    }

    /// Unsubscribe a user from a section. `POST /unsubscribe_user`
    pub async fn unsubscribe(&self, user_id: &str, section_id: &SectionId) -> Result<Outcome> {
        let body = UserSectionRequest {
            user_id,
            section_id,
        };
        let response = self.post(&["unsubscribe_user"], &body).await?;
        mutation_outcome(response, UNSUBSCRIBE_FAILED).await
    }

    /// List a user's subscriptions. `POST /get_subscriptions`
    pub async fn subscriptions(&self, user_id: &str) -> Result<Vec<Subscription>> {
        let response = self
            .post(&["get_subscriptions"], &UserRequest { user_id })
            .await?;
        let list: SubscriptionList = ensure_success(response).await?.json().await?;
        Ok(list.subscriptions)
    }

    /// Fetch X-Ray data for a class. `GET /xray/{class_number}`
    ///
    /// Returns `None` when the backend does not know the class.
    pub async fn xray(&self, class_number: &str) -> Result<Option<XrayData>> {
        let response = self.get(&["xray", class_number]).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let data = ensure_success(response).await?.json().await?;
        Ok(Some(data))
    }

    /// Fetch raw open/close history. `GET /class_open_history/{class_number}`
    pub async fn open_history(&self, class_number: &str) -> Result<Vec<RawChangeRecord>> {
        let response = self.get(&["class_open_history", class_number]).await?;
        let history: OpenHistory = ensure_success(response).await?.json().await?;
        Ok(history.history)
    }

    /// Current available seats of a section. `GET /section/{section_id}`
    ///
    /// Returns `None` when the section is unknown or reports no count.
    pub async fn section_seats(&self, section_id: &SectionId) -> Result<Option<i64>> {
        let id = section_id.to_string();
        let response = self.get(&["section", &id]).await?;
        if response.status() != StatusCode::OK {
            return Ok(None);
        }
        let status: SectionStatus = response.json().await?;
        Ok(status.available_seats)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| BackendError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn post<B: Serialize>(&self, segments: &[&str], body: &B) -> Result<Response> {
        let url = self.endpoint(segments)?;
        trace!(url = %url, "POST");
        Ok(self.client.post(url).json(body).send().await?)
    }

    async fn get(&self, segments: &[&str]) -> Result<Response> {
        let url = self.endpoint(segments)?;
        trace!(url = %url, "GET");
        Ok(self.client.get(url).send().await?)
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(BackendError::Status {
        status: status.as_u16(),
        body,
    })
}

async fn mutation_outcome(response: Response, fallback: &str) -> Result<Outcome> {
    if response.status() == StatusCode::OK {
        return Ok(Outcome::Accepted);
    }

    let text = response.text().await?;
    let message = serde_json::from_str::<BackendErrorBody>(&text)
        .ok()
        .and_then(|body| body.error)
        .unwrap_or_else(|| fallback.to_string());
    Ok(Outcome::Rejected(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> BackendClient {
        BackendClient::new(Url::parse(base).unwrap(), Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let c = client("http://localhost:5000/");
        assert_eq!(
            c.endpoint(&["xray", "12345"]).unwrap().as_str(),
            "http://localhost:5000/xray/12345"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let c = client("http://localhost:5000/api/");
        assert_eq!(
            c.endpoint(&["create_user"]).unwrap().as_str(),
            "http://localhost:5000/api/create_user"
        );
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let c = client("http://localhost:5000/");
        assert_eq!(
            c.endpoint(&["xray", "12/34 5"]).unwrap().as_str(),
            "http://localhost:5000/xray/12%2F34%205"
        );
    }

    #[test]
    fn test_outcome_is_accepted() {
        assert!(Outcome::Accepted.is_accepted());
        assert!(!Outcome::Rejected("no".into()).is_accepted());
    }
}
