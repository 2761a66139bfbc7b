use std::collections::HashMap;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::user::errors::DisplayNameError;
use crate::domain::user::models::DisplayName;
use crate::domain::user::models::Profile;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

/// HTTP request body for replacing the profile (raw JSON)
///
/// This is a full replacement: attributes absent from the body are dropped.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpdateUserRequest {
    display_name: String,
    #[serde(flatten)]
    attributes: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Error)]
enum ParseUpdateUserRequestError {
    #[error("Invalid display name: {0}")]
    DisplayName(#[from] DisplayNameError),
}

impl UpdateUserRequest {
    fn try_into_profile(self) -> Result<Profile, ParseUpdateUserRequestError> {
        let display_name = DisplayName::new(self.display_name)?;
        Ok(Profile {
            display_name,
            attributes: self.attributes,
        })
    }
}

impl From<ParseUpdateUserRequestError> for ApiError {
    fn from(err: ParseUpdateUserRequestError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

pub async fn update_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<ApiSuccess<()>, ApiError> {
    let profile = body.try_into_profile()?;

    state
        .auth_service
        .update_profile(user.user_id, profile)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, ()))
}
