use config::Config;
use database::{PostRepository, UserRepository};
use session::SessionManager;
use sqlx::SqlitePool;

pub mod cli;
pub mod common;
pub mod config;
pub mod database;
pub mod error;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod session;
pub mod utils;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    pub users: UserRepository,
    pub posts: PostRepository,
    pub sessions: SessionManager,
}

impl AppState {
    /// 所有存储库共享同一个连接池
    pub fn new(pool: SqlitePool, config: Config) -> Self {
        let users = UserRepository::new(pool.clone(), config.bcrypt_cost);
        let posts = PostRepository::new(pool.clone());
        let sessions = SessionManager::new(users.clone(), &config);

        Self {
            pool,
            config,
            users,
            posts,
            sessions,
        }
    }
}
