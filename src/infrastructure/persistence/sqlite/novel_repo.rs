//! SQLite Novel Repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::DbPool;
use crate::application::ports::{
    ChapterRecord, ChapterSummary, NovelRecord, NovelRepositoryPort, RepositoryError,
};
use crate::domain::manuscript::SourceEncoding;
use crate::domain::novel::NovelStatus;

const NOVEL_COLUMNS: &str =
    "id, title, status, encoding, digest, size_bytes, total_chapters, created_at, updated_at";

fn db_err(e: sqlx::Error) -> RepositoryError {
    RepositoryError::DatabaseError(e.to_string())
}

fn parse_time(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| RepositoryError::SerializationError(e.to_string()))
}

/// SQLite Novel Repository
pub struct SqliteNovelRepository {
    pool: DbPool,
}

impl SqliteNovelRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct NovelRow {
    id: String,
    title: String,
    status: String,
    encoding: String,
    digest: String,
    size_bytes: i64,
    total_chapters: i64,
    created_at: String,
    updated_at: String,
}

impl TryFrom<NovelRow> for NovelRecord {
    type Error = RepositoryError;

    fn try_from(row: NovelRow) -> Result<Self, Self::Error> {
        Ok(NovelRecord {
            id: Uuid::parse_str(&row.id)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?,
            title: row.title,
            status: NovelStatus::from_str(&row.status).ok_or_else(|| {
                RepositoryError::SerializationError(format!("unknown status: {}", row.status))
            })?,
            encoding: SourceEncoding::from_str(&row.encoding).ok_or_else(|| {
                RepositoryError::SerializationError(format!("unknown encoding: {}", row.encoding))
            })?,
            digest: row.digest,
            size_bytes: row.size_bytes as u64,
            total_chapters: row.total_chapters as usize,
            created_at: parse_time(&row.created_at)?,
            updated_at: parse_time(&row.updated_at)?,
        })
    }
}

#[derive(FromRow)]
struct ChapterRow {
    novel_id: String,
    chapter_index: i64,
    title: String,
    content: String,
    char_count: i64,
}

impl TryFrom<ChapterRow> for ChapterRecord {
    type Error = RepositoryError;

    fn try_from(row: ChapterRow) -> Result<Self, Self::Error> {
        Ok(ChapterRecord {
            novel_id: Uuid::parse_str(&row.novel_id)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?,
            index: row.chapter_index as usize,
            title: row.title,
            content: row.content,
            char_count: row.char_count as usize,
        })
    }
}

#[derive(FromRow)]
struct ChapterTitleRow {
    chapter_index: i64,
    title: String,
}

#[async_trait]
impl NovelRepositoryPort for SqliteNovelRepository {
    async fn save(&self, novel: &NovelRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO novels (id, title, status, encoding, digest, size_bytes, total_chapters, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                status = excluded.status,
                total_chapters = excluded.total_chapters,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(novel.id.to_string())
        .bind(&novel.title)
        .bind(novel.status.as_str())
        .bind(novel.encoding.as_str())
        .bind(&novel.digest)
        .bind(novel.size_bytes as i64)
        .bind(novel.total_chapters as i64)
        .bind(novel.created_at.to_rfc3339())
        .bind(novel.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<NovelRecord>, RepositoryError> {
        let row: Option<NovelRow> =
            sqlx::query_as(&format!("SELECT {} FROM novels WHERE id = ?", NOVEL_COLUMNS))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_err)?;

        row.map(NovelRecord::try_from).transpose()
    }

    async fn find_all(&self) -> Result<Vec<NovelRecord>, RepositoryError> {
        let rows: Vec<NovelRow> = sqlx::query_as(&format!(
            "SELECT {} FROM novels ORDER BY created_at DESC",
            NOVEL_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(NovelRecord::try_from).collect()
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        sqlx::query("DELETE FROM chapters WHERE novel_id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        sqlx::query("DELETE FROM novels WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;

        Ok(())
    }

    async fn replace_chapters(
        &self,
        novel_id: Uuid,
        chapters: &[ChapterRecord],
    ) -> Result<(), RepositoryError> {
        let status = if chapters.is_empty() {
            NovelStatus::Pending
        } else {
            NovelStatus::Ready
        };

        // 旧列表、新列表与小说状态在同一事务内切换
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let updated = sqlx::query(
            "UPDATE novels SET status = ?, total_chapters = ?, updated_at = ? WHERE id = ?",
        )
        .bind(status.as_str())
        .bind(chapters.len() as i64)
        .bind(Utc::now().to_rfc3339())
        .bind(novel_id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        if updated.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("novel {}", novel_id)));
        }

        sqlx::query("DELETE FROM chapters WHERE novel_id = ?")
            .bind(novel_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        for chapter in chapters {
            sqlx::query(
                r#"
                INSERT INTO chapters (novel_id, chapter_index, title, content, char_count)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(novel_id.to_string())
            .bind(chapter.index as i64)
            .bind(&chapter.title)
            .bind(&chapter.content)
            .bind(chapter.char_count as i64)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        }

        tx.commit().await.map_err(db_err)?;

        Ok(())
    }

    async fn find_chapter(
        &self,
        novel_id: Uuid,
        index: usize,
    ) -> Result<Option<ChapterRecord>, RepositoryError> {
        let row: Option<ChapterRow> = sqlx::query_as(
            "SELECT novel_id, chapter_index, title, content, char_count FROM chapters WHERE novel_id = ? AND chapter_index = ?",
        )
        .bind(novel_id.to_string())
        .bind(index as i64)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(ChapterRecord::try_from).transpose()
    }

    async fn list_chapter_titles(&self, novel_id: Uuid) -> Result<Vec<ChapterSummary>, RepositoryError> {
        let rows: Vec<ChapterTitleRow> = sqlx::query_as(
            "SELECT chapter_index, title FROM chapters WHERE novel_id = ? ORDER BY chapter_index",
        )
        .bind(novel_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|row| ChapterSummary {
                index: row.chapter_index as usize,
                title: row.title,
            })
            .collect())
    }

    async fn count_chapters(&self, novel_id: Uuid) -> Result<usize, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM chapters WHERE novel_id = ?")
            .bind(novel_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::manuscript::RawManuscript;
    use crate::domain::novel::{Chapter, Novel, Title};
    use crate::infrastructure::persistence::sqlite::{create_pool, run_migrations, DatabaseConfig};

    async fn repo() -> SqliteNovelRepository {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteNovelRepository::new(pool)
    }

    fn record(title: &str) -> NovelRecord {
        let raw = RawManuscript::new("第一章 开始\n内容".as_bytes().to_vec());
        let novel = Novel::import(Title::new(title).unwrap(), &raw).unwrap();
        NovelRecord::from(&novel)
    }

    fn chapters(novel_id: Uuid, titles: &[&str]) -> Vec<ChapterRecord> {
        let chapters: Vec<Chapter> = titles
            .iter()
            .map(|t| Chapter::new(*t, format!("{}\n内容", t)))
            .collect();
        ChapterRecord::from_chapters(novel_id, &chapters)
    }

    #[tokio::test]
    async fn test_save_and_find() {
        let repo = repo().await;
        let novel = record("测试小说");
        repo.save(&novel).await.unwrap();

        let found = repo.find_by_id(novel.id).await.unwrap().unwrap();
        assert_eq!(found.title, "测试小说");
        assert_eq!(found.status, NovelStatus::Pending);
        assert_eq!(found.encoding, SourceEncoding::Utf8);
        assert_eq!(found.digest, novel.digest);

        assert!(repo.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_replace_chapters() {
        let repo = repo().await;
        let novel = record("测试小说");
        repo.save(&novel).await.unwrap();

        repo.replace_chapters(novel.id, &chapters(novel.id, &["序章", "第一章", "第二章"]))
            .await
            .unwrap();
        repo.replace_chapters(novel.id, &chapters(novel.id, &["第一章", "第二章"]))
            .await
            .unwrap();

        let found = repo.find_by_id(novel.id).await.unwrap().unwrap();
        assert_eq!(found.status, NovelStatus::Ready);
        assert_eq!(found.total_chapters, 2);
        assert_eq!(repo.count_chapters(novel.id).await.unwrap(), 2);

        let titles = repo.list_chapter_titles(novel.id).await.unwrap();
        assert_eq!(
            titles,
            vec![
                ChapterSummary { index: 0, title: "第一章".to_string() },
                ChapterSummary { index: 1, title: "第二章".to_string() },
            ]
        );

        let chapter = repo.find_chapter(novel.id, 1).await.unwrap().unwrap();
        assert_eq!(chapter.content, "第二章\n内容");
        assert!(repo.find_chapter(novel.id, 2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_replace_chapters_unknown_novel() {
        let repo = repo().await;
        let id = Uuid::new_v4();
        let result = repo.replace_chapters(id, &chapters(id, &["第一章"])).await;
        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
        assert_eq!(repo.count_chapters(id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_removes_chapters() {
        let repo = repo().await;
        let novel = record("测试小说");
        repo.save(&novel).await.unwrap();
        repo.replace_chapters(novel.id, &chapters(novel.id, &["第一章"]))
            .await
            .unwrap();

        repo.delete(novel.id).await.unwrap();

        assert!(repo.find_by_id(novel.id).await.unwrap().is_none());
        assert_eq!(repo.count_chapters(novel.id).await.unwrap(), 0);
    }
}
