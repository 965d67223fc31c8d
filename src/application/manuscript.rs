//! 原稿读取与规范化（命令/查询共用）

use uuid::Uuid;

use crate::application::error::ApplicationError;
use crate::application::ports::{ManuscriptStoragePort, StorageError};
use crate::domain::manuscript::{NormalizedText, RawManuscript};

/// 读取原稿并转换为规范化文本
pub(crate) async fn load_normalized(
    storage: &dyn ManuscriptStoragePort,
    novel_id: Uuid,
) -> Result<NormalizedText, ApplicationError> {
    let bytes = match storage.read(novel_id).await {
        Ok(bytes) => bytes,
        Err(StorageError::NotFound(path)) => {
            tracing::error!(novel_id = %novel_id, path = %path, "Manuscript file missing");
            return Err(ApplicationError::MissingSourceFile(novel_id));
        }
        Err(e) => return Err(e.into()),
    };

    let raw = RawManuscript::new(bytes);
    tracing::debug!(
        novel_id = %novel_id,
        encoding = %raw.encoding(),
        "Manuscript decoded"
    );
    Ok(raw.normalize())
}
