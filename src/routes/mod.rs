pub mod post;
pub mod user;

use axum::extract::State;

use crate::AppState;
use crate::common::ApiResponse;
use crate::error::AppError;
use crate::utils::success_to_api_response;

#[derive(Debug, serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// 存活检查，顺带确认数据库可用
pub async fn health(
    State(state): State<AppState>,
) -> Result<axum::Json<ApiResponse<HealthResponse>>, AppError> {
    sqlx::query("SELECT 1")
        .execute(&state.pool)
        .await
        .map_err(|e| AppError::Internal(format!("health check failed: {}", e)))?;

    Ok(success_to_api_response(HealthResponse { status: "ok" }))
}
