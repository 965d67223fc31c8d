//! Chapter HTTP Handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::{GetChapter, ListChapters};
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use super::segment::ChapterItem;
use crate::infrastructure::http::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GetChapterRequest {
    pub novel_id: Uuid,
    #[serde(default)]
    pub index: i64,
}

#[derive(Debug, Deserialize)]
pub struct ListChaptersRequest {
    pub novel_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ChapterDto {
    pub index: usize,
    pub total: usize,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ChapterListDto {
    pub total: usize,
    pub chapters: Vec<ChapterItem>,
}

/// 按序号获取章节
pub async fn get_chapter(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GetChapterRequest>,
) -> Result<Json<ApiResponse<ChapterDto>>, ApiError> {
    let result = state
        .get_chapter_handler
        .handle(GetChapter {
            novel_id: req.novel_id,
            index: req.index,
        })
        .await?;

    Ok(Json(ApiResponse::success(ChapterDto {
        index: result.index,
        total: result.total,
        title: result.title,
        content: result.content,
    })))
}

/// 章节目录
pub async fn list_chapters(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ListChaptersRequest>,
) -> Result<Json<ApiResponse<ChapterListDto>>, ApiError> {
    let result = state
        .list_chapters_handler
        .handle(ListChapters {
            novel_id: req.novel_id,
        })
        .await?;

    Ok(Json(ApiResponse::success(ChapterListDto {
        total: result.total,
        chapters: result.chapters.into_iter().map(ChapterItem::from).collect(),
    })))
}
