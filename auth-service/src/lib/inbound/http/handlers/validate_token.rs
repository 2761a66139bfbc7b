use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;

/// Echo back the claims of the presented access token.
///
/// Verification already happened in the middleware; reaching this handler
/// means the token is good.
pub async fn validate_token(
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<ValidateTokenResponseData>, ApiError> {
    Ok(ApiSuccess::new(StatusCode::OK, (&user).into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidateTokenResponseData {
    pub user_id: String,
    pub contacts: Vec<String>,
    pub issued_at: i64,
    pub expires_at: i64,
}

impl From<&AuthenticatedUser> for ValidateTokenResponseData {
    fn from(user: &AuthenticatedUser) -> Self {
        Self {
            user_id: user.claims.sub.clone(),
            contacts: user.claims.contacts.clone(),
            issued_at: user.claims.iat,
            expires_at: user.claims.exp,
        }
    }
}
