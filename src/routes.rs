use axum::{
    extract::{DefaultBodyLimit, State},
    http::{HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Json},
    routing::{delete, get},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::handlers::protected::pinned;
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

/// Full application router
pub fn app(state: AppState, config: &AppConfig) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Protected
        .merge(pinned_routes(state.clone()))
        // Global middleware
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn pinned_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Both spellings, with and without the trailing slash
        .route("/pinned-resources", get(pinned::pinned_get).post(pinned::pinned_post))
        .route("/pinned-resources/", get(pinned::pinned_get).post(pinned::pinned_post))
        .route("/pinned-resources/:id", delete(pinned::pinned_delete))
        .route("/pinned-resources/:id/", delete(pinned::pinned_delete))
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    if !config.security.enable_cors {
        return CorsLayer::new();
    }
    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Pinned Resources API",
            "version": version,
            "description": "Bookmark documents, links and files for quick access",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "pinned": "GET|POST /pinned-resources/ (protected)",
                "unpin": "DELETE /pinned-resources/:id/?resource_type=document|link|file (protected)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.pins.ping().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{seeded_state, seeded_state_with_catalog, token_for, SeededIds};
    use crate::types::ResourceKind;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request};
    use tower::ServiceExt;
    use uuid::Uuid;

    fn config() -> AppConfig {
        AppConfig::development()
    }

    async fn send(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn ids(items: &Value) -> Vec<i64> {
        items.as_array().unwrap().iter().map(|i| i["id"].as_i64().unwrap()).collect()
    }

    /// Pins D1, L1, L2 and F1 for a fresh user
    async fn pinned_user(app: &Router, seeded: SeededIds) -> String {
        let token = token_for(Uuid::new_v4(), "full");
        let (status, _) = send(
            app,
            Method::POST,
            "/pinned-resources/",
            Some(&token),
            Some(json!({
                "document": [seeded.document_1],
                "link": [seeded.link_1, seeded.link_2],
                "file": [seeded.file_1],
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        token
    }

    #[tokio::test]
    async fn health_is_public() {
        let (state, _) = seeded_state().await;
        let app = app(state, &config());
        let (status, body) = send(&app, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
    }

    #[tokio::test]
    async fn pinned_routes_require_a_token() {
        let (state, _) = seeded_state().await;
        let app = app(state, &config());

        let (status, body) = send(&app, Method::GET, "/pinned-resources/", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHORIZED");

        let (status, _) = send(&app, Method::GET, "/pinned-resources/", Some("not-a-jwt"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn denied_users_are_forbidden() {
        let (state, _) = seeded_state().await;
        let app = app(state, &config());
        let token = token_for(Uuid::new_v4(), "deny");
        let (status, _) = send(&app, Method::GET, "/pinned-resources/", Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn user_without_set_gets_empty_lists() {
        let (state, _) = seeded_state().await;
        let app = app(state, &config());
        let token = token_for(Uuid::new_v4(), "full");

        let (status, body) = send(&app, Method::GET, "/pinned-resources/", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "document": [], "link": [], "file": [] }));
    }

    #[tokio::test]
    async fn get_returns_expanded_resources() {
        let (state, seeded) = seeded_state().await;
        let app = app(state, &config());
        let token = pinned_user(&app, seeded).await;

        let (status, body) = send(&app, Method::GET, "/pinned-resources", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&body["document"]), vec![seeded.document_1]);
        assert_eq!(ids(&body["link"]), vec![seeded.link_1, seeded.link_2]);
        assert_eq!(ids(&body["file"]), vec![seeded.file_1]);
        assert_eq!(body["link"][0]["title"], "Cultural Studies Lecture");
        assert_eq!(body["file"][0]["file_name"], "Hey Notes");
    }

    #[tokio::test]
    async fn delete_link_leaves_other_kinds_alone() {
        let (state, seeded) = seeded_state().await;
        let app = app(state, &config());
        let token = pinned_user(&app, seeded).await;

        let uri = format!("/pinned-resources/{}/?resource_type=link", seeded.link_1);
        let (status, body) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "Message": "Link successfully removed" }));

        let (_, body) = send(&app, Method::GET, "/pinned-resources/", Some(&token), None).await;
        assert_eq!(ids(&body["link"]), vec![seeded.link_2]);
        assert_eq!(ids(&body["document"]), vec![seeded.document_1]);
        assert_eq!(ids(&body["file"]), vec![seeded.file_1]);
    }

    #[tokio::test]
    async fn delete_each_kind_with_mixed_case_tags() {
        let (state, seeded) = seeded_state().await;
        let app = app(state, &config());
        let token = pinned_user(&app, seeded).await;

        for (id, tag, message) in [
            (seeded.link_1, "Link", "Link successfully removed"),
            (seeded.file_1, "FILE", "File successfully removed"),
            (seeded.document_1, "document", "Document successfully removed"),
        ] {
            let uri = format!("/pinned-resources/{}/?resource_type={}", id, tag);
            let (status, body) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["Message"], message);
        }

        let (_, body) = send(&app, Method::GET, "/pinned-resources/", Some(&token), None).await;
        assert_eq!(ids(&body["link"]), vec![seeded.link_2]);
        assert!(ids(&body["document"]).is_empty());
        assert!(ids(&body["file"]).is_empty());
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let (state, seeded) = seeded_state().await;
        let app = app(state, &config());
        let token = pinned_user(&app, seeded).await;

        let uri = format!("/pinned-resources/{}/?resource_type=file", seeded.file_1);
        for _ in 0..2 {
            let (status, _) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
            assert_eq!(status, StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn unknown_resource_type_is_rejected_without_mutation() {
        let (state, seeded) = seeded_state().await;
        let app = app(state, &config());
        let token = pinned_user(&app, seeded).await;

        for query in ["?resource_type=video", "", "?resource_type="] {
            let uri = format!("/pinned-resources/{}/{}", seeded.link_1, query);
            let (status, body) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["Error"], "Invalid resource type");
        }

        let (_, body) = send(&app, Method::GET, "/pinned-resources/", Some(&token), None).await;
        assert_eq!(ids(&body["link"]), vec![seeded.link_1, seeded.link_2]);
        assert_eq!(ids(&body["document"]), vec![seeded.document_1]);
        assert_eq!(ids(&body["file"]), vec![seeded.file_1]);
    }

    #[tokio::test]
    async fn repeated_resource_type_is_a_json_bad_request() {
        let (state, seeded) = seeded_state().await;
        let app = app(state, &config());
        let token = pinned_user(&app, seeded).await;

        let uri = format!("/pinned-resources/{}/?resource_type=link&resource_type=file", seeded.link_1);
        let (status, body) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "Error": "Invalid resource type", "code": "BAD_REQUEST" }));

        let (_, body) = send(&app, Method::GET, "/pinned-resources/", Some(&token), None).await;
        assert_eq!(ids(&body["link"]), vec![seeded.link_1, seeded.link_2]);
        assert_eq!(ids(&body["file"]), vec![seeded.file_1]);
    }

    #[tokio::test]
    async fn delete_without_set_is_not_found() {
        let (state, _) = seeded_state().await;
        let app = app(state, &config());
        let token = token_for(Uuid::new_v4(), "full");

        let (status, body) = send(&app, Method::DELETE, "/pinned-resources/10/?resource_type=link", Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn delete_with_non_numeric_id_is_bad_request() {
        let (state, seeded) = seeded_state().await;
        let app = app(state, &config());
        let token = pinned_user(&app, seeded).await;

        let (status, _) = send(&app, Method::DELETE, "/pinned-resources/abc/?resource_type=link", Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn users_only_touch_their_own_set() {
        let (state, seeded) = seeded_state().await;
        let app = app(state, &config());
        let alice = pinned_user(&app, seeded).await;
        let bob = pinned_user(&app, seeded).await;

        let uri = format!("/pinned-resources/{}/?resource_type=link", seeded.link_1);
        send(&app, Method::DELETE, &uri, Some(&alice), None).await;

        let (_, body) = send(&app, Method::GET, "/pinned-resources/", Some(&bob), None).await;
        assert_eq!(ids(&body["link"]), vec![seeded.link_1, seeded.link_2]);
    }

    #[tokio::test]
    async fn pin_is_additive_and_rejects_unknown_ids() {
        let (state, seeded) = seeded_state().await;
        let app = app(state, &config());
        let token = token_for(Uuid::new_v4(), "full");

        let (status, body) = send(&app, Method::POST, "/pinned-resources/", Some(&token), Some(json!({ "link": [seeded.link_1] }))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(ids(&body["link"]), vec![seeded.link_1]);

        let (status, body) = send(&app, Method::POST, "/pinned-resources/", Some(&token), Some(json!({ "link": [seeded.link_2] }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&body["link"]), vec![seeded.link_1, seeded.link_2]);

        let (status, body) = send(&app, Method::POST, "/pinned-resources/", Some(&token), Some(json!({ "file": [seeded.file_1], "document": [404] }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["Error"], "Document not found: 404");

        let (_, body) = send(&app, Method::GET, "/pinned-resources/", Some(&token), None).await;
        assert!(ids(&body["file"]).is_empty());
    }

    #[tokio::test]
    async fn pin_with_malformed_body_is_bad_request() {
        let (state, _) = seeded_state().await;
        let app = app(state, &config());
        let token = token_for(Uuid::new_v4(), "full");

        let (status, body) = send(&app, Method::POST, "/pinned-resources/", Some(&token), Some(json!({ "link": "ten" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_JSON");
    }

    #[tokio::test]
    async fn deleted_catalog_resources_drop_out_of_the_listing() {
        let (state, catalog, seeded) = seeded_state_with_catalog().await;
        let app = app(state, &config());
        let token = pinned_user(&app, seeded).await;

        catalog.delete(ResourceKind::Link, seeded.link_2).await;

        let (status, body) = send(&app, Method::GET, "/pinned-resources/", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&body["link"]), vec![seeded.link_1]);
    }
}
