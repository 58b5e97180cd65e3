use axum::{
    extract::{Json, State, rejection::JsonRejection},
    http::StatusCode,
};
use axum_extra::extract::cookie::CookieJar;

use super::model::{LoginRequest, ProfileResponse, SignupRequest, UserInfo};
use crate::common::{ApiResponse, EmptyResponse};
use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::utils::success_to_api_response;
use crate::AppState;

type ApiJson<T> = Json<ApiResponse<T>>;

fn start_session(state: &AppState, jar: CookieJar, user_id: i64) -> Result<CookieJar, AppError> {
    state
        .sessions
        .issue(jar, user_id)
        .map_err(|e| AppError::Internal(format!("failed to sign session token: {}", e)))
}

/// 注册成功后直接登录
#[axum::debug_handler]
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, CookieJar, ApiJson<UserInfo>), AppError> {
    let Json(req) = payload?;
    let user = state
        .users
        .create(&req.email, &req.password, &req.name)
        .await?;

    let jar = start_session(&state, jar, user.id)?;
    Ok((StatusCode::CREATED, jar, success_to_api_response(user.into())))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, ApiJson<UserInfo>), AppError> {
    let Json(req) = payload?;
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::Validation("Email and password are required".into()));
    }

    let user = state.users.authenticate(&req.email, &req.password).await?;

    let jar = start_session(&state, jar, user.id)?;
    tracing::info!("User {} logged in", user.id);
    Ok((jar, success_to_api_response(user.into())))
}

/// 未登录时调用同样成功
#[axum::debug_handler]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, ApiJson<EmptyResponse>) {
    (state.sessions.clear(jar), success_to_api_response(EmptyResponse {}))
}

#[axum::debug_handler(state = AppState)]
pub async fn me(AuthUser(user): AuthUser) -> ApiJson<UserInfo> {
    success_to_api_response(user.into())
}

#[axum::debug_handler]
pub async fn profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<ApiJson<ProfileResponse>, AppError> {
    let blogs = state.posts.list_by_author(user.id).await?;
    Ok(success_to_api_response(ProfileResponse::new(user, blogs)))
}
