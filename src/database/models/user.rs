use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// 用户数据库实体
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserEntity {
    pub id: i64,
    pub email: String,
    /// bcrypt 哈希，不对外输出
    #[serde(skip_serializing)]
    #[sqlx(rename = "password")]
    pub password_hash: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
