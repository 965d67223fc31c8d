//! Novel HTTP Handlers

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::{
    DeleteNovel, GetNovel, ImportNovel, ListNovels, NovelResponse as NovelView, PreviewManuscript,
};
use crate::infrastructure::http::dto::{ApiResponse, Empty};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct NovelResponse {
    pub id: Uuid,
    pub title: String,
    pub status: String,
    pub encoding: String,
    pub digest: String,
    pub size_bytes: u64,
    pub total_chapters: usize,
    pub created_at: String,
    pub updated_at: String,
}

impl From<NovelView> for NovelResponse {
    fn from(n: NovelView) -> Self {
        Self {
            id: n.id,
            title: n.title,
            status: n.status,
            encoding: n.encoding,
            digest: n.digest,
            size_bytes: n.size_bytes,
            total_chapters: n.total_chapters,
            created_at: n.created_at,
            updated_at: n.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NovelUploadResponse {
    pub id: Uuid,
    pub title: String,
    pub status: String,
    pub encoding: String,
    pub total_lines: usize,
}

#[derive(Debug, Deserialize)]
pub struct GetNovelRequest {
    pub id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct DeleteNovelRequest {
    pub id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub novel_id: Uuid,
    #[serde(default)]
    pub lines: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub novel_id: Uuid,
    pub total_lines: usize,
    pub lines: Vec<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// 上传小说 TXT 文件：保存原稿并创建 pending 记录
pub async fn upload_novel(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<NovelUploadResponse>>, ApiError> {
    let mut title: Option<String> = None;
    let mut file_name: Option<String> = None;
    let mut bytes: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError::BadRequest(format!("Failed to read multipart field: {}", e))
    })? {
        let field_name = field.name().unwrap_or_default().to_string();

        match field_name.as_str() {
            "title" => {
                title = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::BadRequest(format!("Failed to read title: {}", e)))?,
                );
            }
            "file" => {
                file_name = field.file_name().map(|s| s.to_string());

                // 验证文件类型
                let content_type = field.content_type().unwrap_or("application/octet-stream");
                let is_txt = file_name
                    .as_ref()
                    .map(|f| f.to_lowercase().ends_with(".txt"))
                    .unwrap_or(false);
                if !is_txt && !content_type.contains("text") {
                    return Err(ApiError::BadRequest(
                        "Only TXT files are allowed".to_string(),
                    ));
                }

                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {}", e)))?;
                bytes = Some(data.to_vec());
            }
            _ => {}
        }
    }

    let bytes = bytes.ok_or_else(|| ApiError::BadRequest("File is required".to_string()))?;

    let result = state
        .import_novel_handler
        .handle(ImportNovel {
            title,
            file_name,
            bytes,
        })
        .await?;

    Ok(Json(ApiResponse::success(NovelUploadResponse {
        id: result.id,
        title: result.title,
        status: result.status.to_string(),
        encoding: result.encoding.to_string(),
        total_lines: result.total_lines,
    })))
}

/// 获取小说列表
pub async fn list_novels(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<NovelResponse>>>, ApiError> {
    let result = state.list_novels_handler.handle(ListNovels).await?;
    let responses = result.into_iter().map(NovelResponse::from).collect();
    Ok(Json(ApiResponse::success(responses)))
}

/// 获取小说详情
pub async fn get_novel(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GetNovelRequest>,
) -> Result<Json<ApiResponse<NovelResponse>>, ApiError> {
    let result = state
        .get_novel_handler
        .handle(GetNovel { novel_id: req.id })
        .await?;
    Ok(Json(ApiResponse::success(NovelResponse::from(result))))
}

/// 删除小说（记录、章节、原稿、目录会话）
pub async fn delete_novel(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DeleteNovelRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    state
        .delete_novel_handler
        .handle(DeleteNovel { novel_id: req.id })
        .await?;
    Ok(Json(ApiResponse::ok()))
}

/// 带行号的原稿预览
pub async fn preview_manuscript(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PreviewRequest>,
) -> Result<Json<ApiResponse<PreviewResponse>>, ApiError> {
    let result = state
        .preview_manuscript_handler
        .handle(PreviewManuscript {
            novel_id: req.novel_id,
            lines: req.lines,
        })
        .await?;

    Ok(Json(ApiResponse::success(PreviewResponse {
        novel_id: result.novel_id,
        total_lines: result.total_lines,
        lines: result.lines,
    })))
}
