use axum::{
    Router,
    routing::{get, post},
};

use crate::{AppState, middleware::log_errors, routes};

// 博客相关的路由
pub fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/blogs", get(routes::post::list_posts).post(routes::post::create_post))
        .route(
            "/blogs/{id}",
            get(routes::post::get_post)
                .put(routes::post::update_post)
                .delete(routes::post::delete_post),
        )
}

// 用户与会话相关的路由
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(routes::user::signup))
        .route("/auth/login", post(routes::user::login))
        .route(
            "/auth/logout",
            post(routes::user::logout).get(routes::user::logout),
        )
        .route("/auth/me", get(routes::user::me))
        .route("/profile", get(routes::user::profile))
}

// 创建主路由
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(routes::health))
        .merge(user_routes())
        .merge(post_routes());

    let base = state.config.api_base_uri.trim_end_matches('/');
    let router = if base.is_empty() {
        Router::new().merge(api)
    } else {
        Router::new().nest(base, api)
    };
    let router = router.layer(axum::middleware::from_fn(log_errors));

    // 开发模式下允许跨域
    #[cfg(debug_assertions)]
    let router = {
        tracing::debug!("Adding CORS layer for development mode");
        router.layer(tower_http::cors::CorsLayer::permissive())
    };

    router.with_state(state)
}
