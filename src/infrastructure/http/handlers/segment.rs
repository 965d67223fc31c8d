//! Segmentation HTTP Handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::{
    AutoSegment, ChapterSummary, ConfirmToc, GetTocSession, ProposeToc, SegmentResponse,
};
use crate::domain::toc_session::TocSessionState;
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AutoSegmentRequest {
    pub novel_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ProposeTocRequest {
    pub novel_id: Uuid,
    pub start_line: usize,
    pub end_line: usize,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmTocRequest {
    pub novel_id: Uuid,
    /// 编辑后的条目，每行一条
    pub entries: String,
}

#[derive(Debug, Deserialize)]
pub struct TocSessionRequest {
    pub novel_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ChapterItem {
    pub index: usize,
    pub title: String,
}

impl From<ChapterSummary> for ChapterItem {
    fn from(s: ChapterSummary) -> Self {
        Self {
            index: s.index,
            title: s.title,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SegmentResultResponse {
    pub novel_id: Uuid,
    pub total: usize,
    pub chapters: Vec<ChapterItem>,
}

impl From<SegmentResponse> for SegmentResultResponse {
    fn from(r: SegmentResponse) -> Self {
        Self {
            novel_id: r.novel_id,
            total: r.total,
            chapters: r.chapters.into_iter().map(ChapterItem::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TocProposalDto {
    pub novel_id: Uuid,
    pub start_line: usize,
    pub end_line: usize,
    pub total_lines: usize,
    pub recognized: usize,
    pub entries: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TocSessionDto {
    pub novel_id: Uuid,
    pub start_line: usize,
    pub end_line: usize,
    pub proposal: Vec<String>,
    #[serde(flatten)]
    pub state: TocSessionState,
    pub updated_at: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// 自动分章
pub async fn auto_segment(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AutoSegmentRequest>,
) -> Result<Json<ApiResponse<SegmentResultResponse>>, ApiError> {
    let result = state
        .auto_segment_handler
        .handle(AutoSegment {
            novel_id: req.novel_id,
        })
        .await?;
    Ok(Json(ApiResponse::success(result.into())))
}

/// 提交目录行范围，返回可编辑的条目提案
pub async fn propose_toc(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ProposeTocRequest>,
) -> Result<Json<ApiResponse<TocProposalDto>>, ApiError> {
    let result = state
        .propose_toc_handler
        .handle(ProposeToc {
            novel_id: req.novel_id,
            start_line: req.start_line,
            end_line: req.end_line,
        })
        .await?;

    Ok(Json(ApiResponse::success(TocProposalDto {
        novel_id: result.novel_id,
        start_line: result.start_line,
        end_line: result.end_line,
        total_lines: result.total_lines,
        recognized: result.recognized,
        entries: result.entries,
    })))
}

/// 确认编辑后的条目并按目录分章
pub async fn confirm_toc(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ConfirmTocRequest>,
) -> Result<Json<ApiResponse<SegmentResultResponse>>, ApiError> {
    let result = state
        .confirm_toc_handler
        .handle(ConfirmToc {
            novel_id: req.novel_id,
            entries: req.entries,
        })
        .await?;
    Ok(Json(ApiResponse::success(result.into())))
}

/// 查看当前目录会话
pub async fn get_toc_session(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TocSessionRequest>,
) -> Result<Json<ApiResponse<TocSessionDto>>, ApiError> {
    let result = state
        .get_toc_session_handler
        .handle(GetTocSession {
            novel_id: req.novel_id,
        })
        .await?;

    Ok(Json(ApiResponse::success(TocSessionDto {
        novel_id: result.novel_id,
        start_line: result.start_line,
        end_line: result.end_line,
        proposal: result.proposal,
        state: result.state,
        updated_at: result.updated_at,
    })))
}
