use chrono::Utc;
use sqlx::SqlitePool;

use crate::database::error::RepoError;
use crate::database::models::user::UserEntity;
use crate::utils::{hash_password, verify_password};

/// 用户存储库，处理所有与用户相关的数据库操作
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
    bcrypt_cost: u32,
}

impl UserRepository {
    pub fn new(pool: SqlitePool, bcrypt_cost: u32) -> Self {
        Self { pool, bcrypt_cost }
    }

    /// 注册用户，邮箱重复返回 Conflict
    pub async fn create(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<UserEntity, RepoError> {
        let email = email.trim();
        let name = name.trim();
        if email.is_empty() || password.is_empty() || name.is_empty() {
            return Err(RepoError::Validation(
                "Email, password and name are required".into(),
            ));
        }

        // bcrypt 比较耗时，放到阻塞线程池
        let cost = self.bcrypt_cost;
        let plain = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&plain, cost)).await??;

        let user = sqlx::query_as::<_, UserEntity>(
            r#"
            INSERT INTO users (email, password, name, created_at)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id, email, password, name, created_at
            "#,
        )
        .bind(email)
        .bind(&password_hash)
        .bind(name)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepoError::from_insert(e, "Email already exists"))?;

        tracing::info!("Registered user {} ({})", user.id, user.email);
        Ok(user)
    }

    /// 邮箱不存在与密码错误返回同一种结果
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<UserEntity, RepoError> {
        let user = self
            .find_by_email(email.trim())
            .await?
            .ok_or(RepoError::InvalidCredentials)?;

        let plain = password.to_string();
        let hash = user.password_hash.clone();
        let valid = tokio::task::spawn_blocking(move || verify_password(&plain, &hash)).await?;

        if !valid {
            tracing::warn!("Failed login attempt for user {}", user.id);
            return Err(RepoError::InvalidCredentials);
        }

        Ok(user)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<UserEntity>, RepoError> {
        let user = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, email, password, name, created_at
            FROM users
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, RepoError> {
        let user = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, email, password, name, created_at
            FROM users
            WHERE email = ?1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
