use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::contact::models::Contact;
use crate::inbound::http::router::AppState;

pub async fn send_nonce(
    State(state): State<AppState>,
    Json(body): Json<SendNonceRequest>,
) -> Result<ApiSuccess<SendNonceResponseData>, ApiError> {
    let contact = Contact::new(body.contact).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    // The recorded intent stays server side; answering differently for known
    // and unknown contacts would reveal who has an account here
    state
        .auth_service
        .send_nonce(contact, body.is_adding_contact)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, SendNonceResponseData::default()))
}

/// HTTP request body for requesting a nonce (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SendNonceRequest {
    contact: String,
    #[serde(default)]
    is_adding_contact: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendNonceResponseData {
    pub message: String,
}

impl Default for SendNonceResponseData {
    fn default() -> Self {
        Self {
            message: "If the contact can receive messages, a code is on its way".to_string(),
        }
    }
}
