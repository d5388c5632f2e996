//! Router-level tests that need no live database.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode, header::AUTHORIZATION},
};
use http_body_util::BodyExt;
use sea_orm::DatabaseConnection;
use tower::ServiceExt;

use folio_api::{AppState, create_router};
use folio_shared::{JwtConfig, JwtService};

fn test_state() -> AppState {
    AppState {
        db: Arc::new(DatabaseConnection::default()),
        jwt_service: Arc::new(JwtService::new(JwtConfig {
            secret: "router-test-secret".to_string(),
            token_expires_hours: 1,
        })),
    }
}

#[tokio::test]
async fn test_health_is_public() {
    let app = create_router(test_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let app = create_router(test_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!(
                    "/api/v1/books/organization/{}",
                    uuid::Uuid::new_v4()
                ))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "missing_token");
}

#[tokio::test]
async fn test_garbage_token_rejected() {
    let app = create_router(test_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!(
                    "/api/v1/books/organization/{}",
                    uuid::Uuid::new_v4()
                ))
                .header(AUTHORIZATION, "Bearer not.a.token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "invalid_token");
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = create_router(test_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/does-not-exist")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
