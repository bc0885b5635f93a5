#[cfg(test)]
mod tests {
    use crate::auth::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use barber_config::{AdminConfig, AppConfig};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn guarded(secret: Option<&str>) -> Router {
        let state = Arc::new(AdminAuthState {
            secret: secret.map(str::to_string),
        });
        Router::new()
            .route("/ping", get(|| async { "pong" }))
            .layer(middleware::from_fn_with_state(state, admin_auth_middleware))
    }

    async fn call(router: Router, header: Option<&str>) -> (StatusCode, String) {
        let mut request = Request::get("/ping");
        if let Some(value) = header {
            request = request.header(ADMIN_AUTH_HEADER, value);
        }
        let response = router.oneshot(request.body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[test]
    fn test_secret_matches() {
        assert!(secret_matches("s3cret", Some("s3cret")));
        assert!(!secret_matches("s3cret", Some("s3cre")));
        assert!(!secret_matches("s3cret", Some("")));
        assert!(!secret_matches("s3cret", None));
    }

    #[test]
    fn test_empty_configured_secret_counts_as_missing() {
        let config = AppConfig {
            admin: Some(AdminConfig {
                shared_secret: Some(String::new()),
            }),
            ..AppConfig::default()
        };
        assert_eq!(AdminAuthState::from_config(&config).secret, None);
        assert_eq!(AdminAuthState::from_config(&AppConfig::default()).secret, None);
    }

    #[tokio::test]
    async fn test_valid_secret_passes() {
        let (status, body) = call(guarded(Some("s3cret")), Some("s3cret")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "pong");
    }

    #[tokio::test]
    async fn test_wrong_or_missing_secret_is_unauthorized() {
        let (status, body) = call(guarded(Some("s3cret")), Some("guess")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, r#"{"error":"Unauthorized"}"#);

        let (status, _) = call(guarded(Some("s3cret")), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unconfigured_secret_fails_closed() {
        let (status, body) = call(guarded(None), Some("anything")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, r#"{"error":"admin auth not configured"}"#);
    }
}
