use thiserror::Error;

/// 存储层错误分类
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("{0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("requester does not own this resource")]
    Forbidden,
    #[error("{0}")]
    Conflict(String),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl RepoError {
    /// 唯一约束冲突单独归类，其余数据库错误原样保留
    pub fn from_insert(err: sqlx::Error, conflict_msg: &str) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                RepoError::Conflict(conflict_msg.to_string())
            }
            _ => RepoError::Database(err),
        }
    }
}
