//! HTTP Middleware
//!
//! 传输层错误日志（4xx / 5xx）。业务错误走 errno，在 ApiError::into_response() 中记录。

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};

/// 记录非 2xx 的 HTTP 状态码及耗时
///
/// 常见来源：JSON 反序列化失败（400/415/422）、请求体超限（413）、路由不存在（404）
pub async fn error_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            uri = %uri,
            status = status.as_u16(),
            elapsed_ms,
            "HTTP server error"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            uri = %uri,
            status = status.as_u16(),
            elapsed_ms,
            "HTTP client error"
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        extract::DefaultBodyLimit,
        http::{header, Method, Request as HttpRequest, StatusCode},
        routing::post,
        Json, Router,
    };
    use serde::Deserialize;
    use tower::util::ServiceExt;

    #[derive(Deserialize)]
    struct Entries {
        entries: String,
    }

    async fn count_entries(Json(req): Json<Entries>) -> String {
        req.entries.lines().count().to_string()
    }

    fn create_test_router() -> Router {
        Router::new()
            .route("/entries", post(count_entries))
            .layer(DefaultBodyLimit::max(64))
            .layer(axum::middleware::from_fn(error_logging_middleware))
    }

    fn json_request(body: String) -> HttpRequest<Body> {
        HttpRequest::builder()
            .method(Method::POST)
            .uri("/entries")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_ok_response_passes_through() {
        let response = create_test_router()
            .oneshot(json_request(r#"{"entries":"a\nb"}"#.to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_malformed_json_is_client_error() {
        let response = create_test_router()
            .oneshot(json_request("{".to_string()))
            .await
            .unwrap();
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let request = HttpRequest::builder()
            .uri("/missing")
            .body(Body::empty())
            .unwrap();
        let response = create_test_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_oversized_body_rejected() {
        let body = format!(r#"{{"entries":"{}"}}"#, "x".repeat(200));
        let response = create_test_router().oneshot(json_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
