//! Novel Commands

use uuid::Uuid;

/// 导入小说命令（上传原稿）
#[derive(Debug, Clone)]
pub struct ImportNovel {
    /// 显式标题；为空时取文件名
    pub title: Option<String>,
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

/// 删除小说命令
#[derive(Debug, Clone)]
pub struct DeleteNovel {
    pub novel_id: Uuid,
}
