use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::{PostEntity, UserEntity};

#[derive(Debug, Deserialize, Serialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// 对外展示的用户信息，不含密码哈希
#[derive(Debug, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserEntity> for UserInfo {
    fn from(user: UserEntity) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user: UserInfo,
    pub blogs: Vec<PostEntity>,
    pub total_posts: usize,
    pub total_words: usize,
}

impl ProfileResponse {
    pub fn new(user: UserEntity, blogs: Vec<PostEntity>) -> Self {
        let total_words = blogs
            .iter()
            .map(|blog| blog.content.split_whitespace().count())
            .sum();

        Self {
            user: user.into(),
            total_posts: blogs.len(),
            total_words,
            blogs,
        }
    }
}
