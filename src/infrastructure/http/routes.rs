//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping                  GET   健康检查
//! - /api/novel/upload          POST  上传小说（multipart: file, title）
//! - /api/novel/list            GET   列出所有小说
//! - /api/novel/get             POST  获取小说详情
//! - /api/novel/delete          POST  删除小说
//! - /api/novel/preview         POST  带行号的原稿预览
//! - /api/segment/auto          POST  自动分章
//! - /api/segment/toc/propose   POST  提交目录行范围，生成条目提案
//! - /api/segment/toc/confirm   POST  确认条目并按目录分章
//! - /api/segment/toc/session   POST  查看目录会话
//! - /api/chapter/get           POST  按序号获取章节
//! - /api/chapter/list          POST  章节目录

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/novel", novel_routes())
        .nest("/segment", segment_routes())
        .nest("/chapter", chapter_routes())
}

/// Novel 路由
fn novel_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/upload", post(handlers::upload_novel))
        .route("/list", get(handlers::list_novels))
        .route("/get", post(handlers::get_novel))
        .route("/delete", post(handlers::delete_novel))
        .route("/preview", post(handlers::preview_manuscript))
}

/// Segment 路由
fn segment_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auto", post(handlers::auto_segment))
        .route("/toc/propose", post(handlers::propose_toc))
        .route("/toc/confirm", post(handlers::confirm_toc))
        .route("/toc/session", post(handlers::get_toc_session))
}

/// Chapter 路由
fn chapter_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/get", post(handlers::get_chapter))
        .route("/list", post(handlers::list_chapters))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::util::ServiceExt;

    use crate::domain::segmentation::SegmentationConfig;
    use crate::infrastructure::adapters::storage::FileManuscriptStorage;
    use crate::infrastructure::memory::InMemoryTocSessionStore;
    use crate::infrastructure::persistence::sqlite::{
        create_pool, run_migrations, DatabaseConfig, SqliteNovelRepository,
    };

    const BOUNDARY: &str = "chapterize-test-boundary";
    const BOOK: &str = "負けヒロインが多すぎる！\n\n目次\n一　出発\n二　再会\n\nまえがき。\n\n一　出発\n朝だった。\n\n二　再会\n夜だった。";

    async fn test_app() -> (Router, TempDir) {
        let dir = TempDir::new().unwrap();
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let storage = FileManuscriptStorage::new(dir.path(), 1024 * 1024).await.unwrap();
        let state = AppState::new(
            Arc::new(SqliteNovelRepository::new(pool)),
            Arc::new(storage),
            Arc::new(InMemoryTocSessionStore::new()),
            SegmentationConfig::default(),
            260,
        );

        (create_routes().with_state(Arc::new(state)), dir)
    }

    async fn send(app: &Router, request: Request<Body>) -> Value {
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn post_json(app: &Router, uri: &str, body: Value) -> Value {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        send(app, request).await
    }

    async fn upload(app: &Router, file_name: &str, content: &str) -> Value {
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\nContent-Type: text/plain\r\n\r\n{c}\r\n--{b}--\r\n",
            b = BOUNDARY,
            f = file_name,
            c = content
        );
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/novel/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();
        send(app, request).await
    }

    #[tokio::test]
    async fn test_ping() {
        let (app, _dir) = test_app().await;
        let request = Request::builder().uri("/api/ping").body(Body::empty()).unwrap();
        let body = send(&app, request).await;
        assert_eq!(body["errno"], 0);
        assert_eq!(body["data"]["status"], "ok");
    }

    #[tokio::test]
    async fn test_toc_workflow() {
        let (app, _dir) = test_app().await;

        let uploaded = upload(&app, "makeine.txt", BOOK).await;
        assert_eq!(uploaded["errno"], 0);
        assert_eq!(uploaded["data"]["title"], "makeine");
        assert_eq!(uploaded["data"]["status"], "pending");
        let id = uploaded["data"]["id"].as_str().unwrap().to_string();

        let preview = post_json(&app, "/api/novel/preview", json!({ "novel_id": id, "lines": 3 })).await;
        assert_eq!(preview["data"]["lines"][2], "   3 | 目次");

        let proposal = post_json(
            &app,
            "/api/segment/toc/propose",
            json!({ "novel_id": id, "start_line": 3, "end_line": 5 }),
        )
        .await;
        assert_eq!(proposal["data"]["entries"], json!(["一 出発", "二 再会"]));

        let missing = post_json(
            &app,
            "/api/segment/toc/confirm",
            json!({ "novel_id": id, "entries": "一 出発\n三 終章" }),
        )
        .await;
        assert_eq!(missing["errno"], 422);
        assert_eq!(missing["data"]["missing"], json!(["三 終章"]));

        let confirmed = post_json(
            &app,
            "/api/segment/toc/confirm",
            json!({ "novel_id": id, "entries": "一 出発\n二 再会" }),
        )
        .await;
        assert_eq!(confirmed["errno"], 0);
        assert_eq!(confirmed["data"]["total"], 3);

        let chapter = post_json(&app, "/api/chapter/get", json!({ "novel_id": id, "index": 99 })).await;
        assert_eq!(chapter["data"]["index"], 2);
        assert_eq!(chapter["data"]["content"], "二　再会\n夜だった。");

        let session = post_json(&app, "/api/segment/toc/session", json!({ "novel_id": id })).await;
        assert_eq!(session["data"]["state"], "matched");
        assert_eq!(session["data"]["chapters"], 3);
    }

    #[tokio::test]
    async fn test_unknown_novel_is_not_found() {
        let (app, _dir) = test_app().await;
        let body = post_json(
            &app,
            "/api/chapter/list",
            json!({ "novel_id": "00000000-0000-0000-0000-000000000000" }),
        )
        .await;
        assert_eq!(body["errno"], 404);
        assert!(body["data"].is_null());
    }
}
