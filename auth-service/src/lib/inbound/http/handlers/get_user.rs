use std::collections::HashMap;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::Account;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn get_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<GetUserResponseData>, ApiError> {
    state
        .auth_service
        .get_account(user.user_id)
        .await
        .map_err(ApiError::from)
        .map(|ref account| ApiSuccess::new(StatusCode::OK, account.into()))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GetUserResponseData {
    pub id: String,
    pub display_name: String,
    pub attributes: HashMap<String, serde_json::Value>,
    pub contacts: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for GetUserResponseData {
    fn from(account: &Account) -> Self {
        Self {
            id: account.user.id.to_string(),
            display_name: account.user.profile.display_name.as_str().to_string(),
            attributes: account.user.profile.attributes.clone(),
            contacts: account
                .contacts
                .iter()
                .map(|contact| contact.to_string())
                .collect(),
            created_at: account.user.created_at,
        }
    }
}
