use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::auth::models::RefreshGrant;
use crate::domain::nonce::models::NonceSecret;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

/// Redeem a contact-adding nonce on behalf of the signed-in caller.
///
/// The nonce proves control of the new contact; the bearer token proves who
/// is adding it. Both are required, which is why this lives behind the
/// authentication middleware.
pub async fn add_contact(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(body): Json<AddContactRequest>,
) -> Result<ApiSuccess<AddContactResponseData>, ApiError> {
    state
        .auth_service
        .exchange_nonce(NonceSecret::from(body.nonce), None, Some(user.user_id))
        .await
        .map_err(ApiError::from)
        .map(|ref grant| ApiSuccess::new(StatusCode::OK, grant.into()))
}

/// HTTP request body for confirming a new contact (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddContactRequest {
    nonce: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddContactResponseData {
    pub user_id: String,
    pub refresh_token: String,
}

impl From<&RefreshGrant> for AddContactResponseData {
    fn from(grant: &RefreshGrant) -> Self {
        Self {
            user_id: grant.user_id.to_string(),
            refresh_token: grant.refresh_token.as_str().to_string(),
        }
    }
}
