use std::collections::HashMap;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::auth::models::RefreshGrant;
use crate::domain::nonce::models::NonceSecret;
use crate::domain::user::errors::DisplayNameError;
use crate::domain::user::models::DisplayName;
use crate::domain::user::models::Profile;
use crate::inbound::http::router::AppState;

pub async fn exchange_nonce(
    State(state): State<AppState>,
    Json(body): Json<ExchangeNonceRequest>,
) -> Result<ApiSuccess<ExchangeNonceResponseData>, ApiError> {
    let secret = NonceSecret::from(body.nonce);
    let profile = body
        .profile
        .map(ProfileBody::try_into_profile)
        .transpose()?;

    // No caller here: contact-adding nonces must go through the
    // authenticated endpoint
    state
        .auth_service
        .exchange_nonce(secret, profile, None)
        .await
        .map_err(ApiError::from)
        .map(|ref grant| ApiSuccess::new(StatusCode::OK, grant.into()))
}

/// HTTP request body for redeeming a nonce (raw JSON)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExchangeNonceRequest {
    nonce: String,
    profile: Option<ProfileBody>,
}

/// Registration profile fields; unknown keys become custom attributes
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProfileBody {
    display_name: String,
    #[serde(flatten)]
    attributes: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Error)]
enum ParseProfileError {
    #[error("Invalid display name: {0}")]
    DisplayName(#[from] DisplayNameError),
}

impl ProfileBody {
    fn try_into_profile(self) -> Result<Profile, ParseProfileError> {
        let display_name = DisplayName::new(self.display_name)?;
        Ok(Profile {
            display_name,
            attributes: self.attributes,
        })
    }
}

impl From<ParseProfileError> for ApiError {
    fn from(err: ParseProfileError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExchangeNonceResponseData {
    pub user_id: String,
    pub refresh_token: String,
}

impl From<&RefreshGrant> for ExchangeNonceResponseData {
    fn from(grant: &RefreshGrant) -> Self {
        Self {
            user_id: grant.user_id.to_string(),
            refresh_token: grant.refresh_token.as_str().to_string(),
        }
    }
}
