use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::token::models::RefreshSecret;
use crate::inbound::http::router::AppState;

pub async fn refresh_token(
    State(state): State<AppState>,
    Json(body): Json<RefreshTokenRequest>,
) -> Result<ApiSuccess<RefreshTokenResponseData>, ApiError> {
    state
        .auth_service
        .exchange_refresh_token(RefreshSecret::from(body.refresh_token))
        .await
        .map_err(ApiError::from)
        .map(|access_token| {
            ApiSuccess::new(StatusCode::OK, RefreshTokenResponseData { access_token })
        })
}

/// HTTP request body for exchanging a refresh token (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RefreshTokenRequest {
    refresh_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshTokenResponseData {
    pub access_token: String,
}
