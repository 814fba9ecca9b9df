//! Router configuration and server setup.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::handlers;
use crate::state::NotifyState;

/// Creates the notify router with all routes configured.
pub fn create_router(state: NotifyState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/notify", post(handlers::notify))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Starts the notify server.
pub async fn serve(state: NotifyState) -> Result<(), std::io::Error> {
    let addr = state.config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Notify server listening on {}", addr);
    axum::serve(listener, create_router(state)).await
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::NotifyConfig;
    use crate::outbound::{dm_channel, DeliveryOutcome};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;

    /// Fake worker: user 1 receives, 2 is unknown, 3 fails, 4 never answers.
    fn make_test_server() -> TestServer {
        let config = NotifyConfig::default().with_reply_timeout(Duration::from_millis(200));
        let (dispatcher, mut rx) = dm_channel(8, config.reply_timeout);

        tokio::spawn(async move {
            let mut parked = Vec::new();
            while let Some(dm) = rx.recv().await {
                match dm.user_id {
                    1 => dm.reply(DeliveryOutcome::Delivered),
                    2 => dm.reply(DeliveryOutcome::UserNotFound),
                    3 => dm.reply(DeliveryOutcome::Failed("Forbidden: bot was blocked".into())),
                    _ => parked.push(dm),
                }
            }
        });

        let app = create_router(NotifyState::new(config, dispatcher));
        TestServer::new(app).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let server = make_test_server();

        let response = server.get("/health").await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["queued"], 0);
    }

    #[tokio::test]
    async fn test_notify_delivered() {
        let server = make_test_server();

        let response = server
            .post("/notify")
            .json(&json!({"user_id": "1", "content": "CS 101 has an open seat!"}))
            .await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_notify_accepts_numeric_user_id() {
        let server = make_test_server();

        let response = server
            .post("/notify")
            .json(&json!({"user_id": 1, "content": "hello"}))
            .await;
        response.assert_status_ok();
    }

    #[tokio::test]
    async fn test_notify_user_not_found() {
        let server = make_test_server();

        let response = server
            .post("/notify")
            .json(&json!({"user_id": 2, "content": "hello"}))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);

        let body: serde_json::Value = response.json();
        assert!(body["error"].as_str().unwrap().contains("user not found"));
    }

    #[tokio::test]
    async fn test_notify_send_failed() {
        let server = make_test_server();

        let response = server
            .post("/notify")
            .json(&json!({"user_id": 3, "content": "hello"}))
            .await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

        let body: serde_json::Value = response.json();
        assert!(body["error"].as_str().unwrap().starts_with("send failed"));
    }

    #[tokio::test]
    async fn test_notify_timeout() {
        let server = make_test_server();

        let response = server
            .post("/notify")
            .json(&json!({"user_id": 4, "content": "hello"}))
            .await;
        response.assert_status(StatusCode::GATEWAY_TIMEOUT);
    }

    #[tokio::test]
    async fn test_notify_missing_user_id() {
        let server = make_test_server();

        let response = server
            .post("/notify")
            .json(&json!({"content": "hello"}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let response = server
            .post("/notify")
            .json(&json!({"user_id": "not-a-number", "content": "hello"}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_notify_empty_content() {
        let server = make_test_server();

        let response = server
            .post("/notify")
            .json(&json!({"user_id": 1, "content": "   "}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_notify_worker_stopped() {
        let config = NotifyConfig::default();
        let (dispatcher, rx) = dm_channel(1, config.reply_timeout);
        drop(rx);
        let server = TestServer::new(create_router(NotifyState::new(config, dispatcher))).unwrap();

        let response = server
            .post("/notify")
            .json(&json!({"user_id": 1, "content": "hello"}))
            .await;
        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    }
}
