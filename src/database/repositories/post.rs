use chrono::Utc;
use sqlx::SqlitePool;

use crate::database::error::RepoError;
use crate::database::models::post::{PostEntity, PostWithAuthor};

/// 博客存储库，每个写操作都是单条原子语句
#[derive(Clone)]
pub struct PostRepository {
    pool: SqlitePool,
}

fn validate(title: &str, content: &str) -> Result<(), RepoError> {
    if title.trim().is_empty() || content.trim().is_empty() {
        return Err(RepoError::Validation(
            "Title and content are required".into(),
        ));
    }
    Ok(())
}

impl PostRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// 全部博客，按创建时间倒序
    pub async fn list(&self) -> Result<Vec<PostWithAuthor>, RepoError> {
        let posts = sqlx::query_as::<_, PostWithAuthor>(
            r#"
            SELECT blogs.id, blogs.title, blogs.content, blogs.author_id,
                   users.name AS author_name, blogs.created_at, blogs.updated_at
            FROM blogs
            JOIN users ON blogs.author_id = users.id
            ORDER BY blogs.created_at DESC, blogs.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    pub async fn list_by_author(&self, author_id: i64) -> Result<Vec<PostEntity>, RepoError> {
        let posts = sqlx::query_as::<_, PostEntity>(
            r#"
            SELECT id, title, content, author_id, created_at, updated_at
            FROM blogs
            WHERE author_id = ?1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    pub async fn get(&self, id: i64) -> Result<PostWithAuthor, RepoError> {
        sqlx::query_as::<_, PostWithAuthor>(
            r#"
            SELECT blogs.id, blogs.title, blogs.content, blogs.author_id,
                   users.name AS author_name, blogs.created_at, blogs.updated_at
            FROM blogs
            JOIN users ON blogs.author_id = users.id
            WHERE blogs.id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepoError::NotFound("Blog"))
    }

    /// 新建博客，返回自增 id
    pub async fn create(&self, author_id: i64, title: &str, content: &str) -> Result<i64, RepoError> {
        validate(title, content)?;

        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO blogs (title, content, author_id, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            "#,
        )
        .bind(title)
        .bind(content)
        .bind(author_id)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                RepoError::NotFound("User")
            }
            _ => RepoError::Database(e),
        })?;

        let id = result.last_insert_rowid();
        tracing::info!("User {} created blog {}", author_id, id);
        Ok(id)
    }

    /// 整体替换标题和内容，只有作者本人可以修改。
    /// 所有权判断放在 UPDATE 语句里，单条语句即是一个原子写入
    pub async fn update(
        &self,
        id: i64,
        requester_id: i64,
        title: &str,
        content: &str,
    ) -> Result<PostEntity, RepoError> {
        validate(title, content)?;

        let updated = sqlx::query_as::<_, PostEntity>(
            r#"
            UPDATE blogs
            SET title = ?1, content = ?2, updated_at = ?3
            WHERE id = ?4 AND author_id = ?5
            RETURNING id, title, content, author_id, created_at, updated_at
            "#,
        )
        .bind(title)
        .bind(content)
        .bind(Utc::now())
        .bind(id)
        .bind(requester_id)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(post) => {
                tracing::info!("User {} updated blog {}", requester_id, id);
                Ok(post)
            }
            None => Err(self.classify_miss(id, requester_id).await),
        }
    }

    pub async fn delete(&self, id: i64, requester_id: i64) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM blogs WHERE id = ?1 AND author_id = ?2")
            .bind(id)
            .bind(requester_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(self.classify_miss(id, requester_id).await);
        }

        tracing::info!("User {} deleted blog {}", requester_id, id);
        Ok(())
    }

    /// 写入没有命中任何行：博客不存在，或者请求者不是作者
    async fn classify_miss(&self, id: i64, requester_id: i64) -> RepoError {
        let author_id = sqlx::query_scalar::<_, i64>("SELECT author_id FROM blogs WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await;

        match author_id {
            Ok(Some(owner)) if owner != requester_id => {
                tracing::warn!("User {} is not the author of blog {}", requester_id, id);
                RepoError::Forbidden
            }
            // 其间被作者本人删除的同样按不存在处理
            Ok(_) => RepoError::NotFound("Blog"),
            Err(e) => RepoError::Database(e),
        }
    }
}
