//! Segmentation Commands

use uuid::Uuid;

/// 自动分章命令
#[derive(Debug, Clone)]
pub struct AutoSegment {
    pub novel_id: Uuid,
}

/// 提交目录行范围（1-based，含首尾），生成提案
#[derive(Debug, Clone)]
pub struct ProposeToc {
    pub novel_id: Uuid,
    pub start_line: usize,
    pub end_line: usize,
}

/// 确认操作者编辑后的条目（每行一条）并按目录分章
#[derive(Debug, Clone)]
pub struct ConfirmToc {
    pub novel_id: Uuid,
    pub entries: String,
}
