use super::*;
use axum::{middleware, routing::post, Router};
use tower::ServiceExt;

const SECRET: &str = "s3cret";

fn app(secret: Option<&str>) -> Router {
    Router::new()
        .route("/hook", post(|body: String| async move { body }))
        .layer(middleware::from_fn_with_state(
            SignatureState::new(secret.map(str::to_owned)),
            signature_middleware,
        ))
}

fn request(body: &str, signature: Option<String>) -> Request {
    let mut builder = axum::http::Request::builder().method("POST").uri("/hook");
    if let Some(signature) = signature {
        builder = builder.header(SIGNATURE_HEADER, signature);
    }
    builder.body(Body::from(body.to_owned())).unwrap()
}

#[tokio::test]
async fn test_valid_signature_passes_body_through() {
    let body = r#"{"status":"started"}"#;
    let signature = sign(SECRET, body.as_bytes()).unwrap();

    let response = app(Some(SECRET))
        .oneshot(request(body, Some(signature)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let echoed = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(echoed, body.as_bytes());
}

#[tokio::test]
async fn test_wrong_signature_is_unauthorized() {
    let signature = sign("other", b"{}").unwrap();

    let response = app(Some(SECRET))
        .oneshot(request("{}", Some(signature)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_missing_or_malformed_header_is_unauthorized() {
    let missing = app(Some(SECRET)).oneshot(request("{}", None)).await.unwrap();
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let malformed = app(Some(SECRET))
        .oneshot(request("{}", Some("sha256=zz".to_string())))
        .await
        .unwrap();
    assert_eq!(malformed.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_no_secret_skips_verification() {
    let response = app(None).oneshot(request("{}", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
