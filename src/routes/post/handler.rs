use axum::{
    extract::{
        Json, Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};

use super::model::{CreatePostResponse, PostRequest};
use crate::common::{ApiResponse, EmptyResponse};
use crate::database::PostWithAuthor;
use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::utils::success_to_api_response;
use crate::AppState;

type ApiJson<T> = Json<ApiResponse<T>>;

// 非数字 id 不可能对应任何博客
fn blog_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, AppError> {
    let Path(id) = path.map_err(|_| AppError::NotFound("Blog"))?;
    Ok(id)
}

#[axum::debug_handler]
pub async fn list_posts(
    State(state): State<AppState>,
) -> Result<ApiJson<Vec<PostWithAuthor>>, AppError> {
    let posts = state.posts.list().await?;
    Ok(success_to_api_response(posts))
}

#[axum::debug_handler]
pub async fn get_post(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<ApiJson<PostWithAuthor>, AppError> {
    let id = blog_id(path)?;
    let post = state.posts.get(id).await?;
    Ok(success_to_api_response(post))
}

#[axum::debug_handler]
pub async fn create_post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<PostRequest>, JsonRejection>,
) -> Result<(StatusCode, ApiJson<CreatePostResponse>), AppError> {
    let Json(req) = payload?;
    let blog_id = state.posts.create(user.id, &req.title, &req.content).await?;

    Ok((
        StatusCode::CREATED,
        success_to_api_response(CreatePostResponse { blog_id }),
    ))
}

#[axum::debug_handler]
pub async fn update_post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<PostRequest>, JsonRejection>,
) -> Result<ApiJson<PostWithAuthor>, AppError> {
    let id = blog_id(path)?;
    let Json(req) = payload?;
    let post = state
        .posts
        .update(id, user.id, &req.title, &req.content)
        .await?;

    // 只有作者本人能更新，作者名直接取当前用户
    Ok(success_to_api_response(PostWithAuthor {
        id: post.id,
        title: post.title,
        content: post.content,
        author_id: post.author_id,
        author_name: user.name,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }))
}

#[axum::debug_handler]
pub async fn delete_post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    path: Result<Path<i64>, PathRejection>,
) -> Result<ApiJson<EmptyResponse>, AppError> {
    let id = blog_id(path)?;
    state.posts.delete(id, user.id).await?;
    Ok(success_to_api_response(EmptyResponse {}))
}
