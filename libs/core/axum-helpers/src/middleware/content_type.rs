use axum::{
    extract::Request,
    http::header::{self, HeaderValue},
    middleware::Next,
    response::Response,
};

/// Middleware that stamps `Content-Type: application/json` on every response
/// that does not already declare a content type.
///
/// Runs outermost so short-circuited responses (CORS preflights, errors from
/// inner layers) carry the header too.
pub async fn json_content_type(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;

    if !response.headers().contains_key(header::CONTENT_TYPE) {
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Router, middleware};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/plain", get(|| async { "hello" }))
            .layer(middleware::from_fn(json_content_type))
    }

    #[tokio::test]
    async fn test_missing_content_type_is_stamped() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/missing")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        // Even the 404 fallback answers as JSON.
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[tokio::test]
    async fn test_existing_content_type_is_kept() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/plain")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
        assert!(content_type.to_str().unwrap().starts_with("text/plain"));
    }
}
