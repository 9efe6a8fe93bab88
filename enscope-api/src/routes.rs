//! API route configuration.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::state::AppState;

/// Creates the API router with all routes configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))

        // Profiles
        .route("/api/v1/profile/:name", get(handlers::get_profile))
        .route("/api/v1/profiles", post(handlers::resolve_profiles))

        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use enscope_ens::ResolverConfig;
    use crate::state::ApiConfig;

    const ADDRESS: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";

    fn test_app(resolver_url: &str) -> Router {
        let config = ApiConfig {
            resolver: ResolverConfig::default()
                .with_resolver_url(resolver_url)
                .with_timeout(5),
            sim_api_key: None,
        };
        create_router(Arc::new(AppState::new(config).unwrap()))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn gateway() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/resolve-name/vitalik.eth"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "address": ADDRESS })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/resolve-text/vitalik.eth"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "records": { "avatar": "https://example.com/v.png" }
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/resolve-name/ghost.eth"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = test_app("http://127.0.0.1:9");

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["enrichment_enabled"], false);
    }

    #[tokio::test]
    async fn test_health_uptime_counts_from_startup() {
        let mut state = AppState::new(ApiConfig::default()).unwrap();
        state.started_at = std::time::Instant::now()
            .checked_sub(std::time::Duration::from_secs(90))
            .unwrap();
        let app = create_router(Arc::new(state));

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let body = body_json(response).await;
        assert!(body["uptime_seconds"].as_u64().unwrap() >= 90);
    }

    #[tokio::test]
    async fn test_get_profile() {
        let server = gateway().await;
        let app = test_app(&server.uri());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/profile/vitalik.eth")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["address"], ADDRESS);
        assert_eq!(body["records"]["avatar"], "https://example.com/v.png");
        assert!(body["enrichment"].is_null());
        assert!(body["resolved_at"].is_string());
    }

    #[tokio::test]
    async fn test_get_profile_invalid_name() {
        let server = MockServer::start().await;
        let app = test_app(&server.uri());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/profile/not-a-name")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(server.received_requests().await.unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn test_get_profile_not_found() {
        let server = gateway().await;
        let app = test_app(&server.uri());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/profile/ghost.eth")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_batch_profiles() {
        let server = gateway().await;
        let app = test_app(&server.uri());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/profiles")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(json!({ "names": "vitalik.eth, ghost.eth" }).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["total"], 2);
        assert_eq!(body["resolved"][0]["name"], "vitalik.eth");
        assert_eq!(body["failed"][0]["name"], "ghost.eth");
    }

    #[tokio::test]
    async fn test_batch_requires_names() {
        let app = test_app("http://127.0.0.1:9");

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/profiles")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"names": []}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
