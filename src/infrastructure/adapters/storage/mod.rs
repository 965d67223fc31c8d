//! Storage Adapter - 原稿文件存储

mod file_storage;

pub use file_storage::FileManuscriptStorage;
