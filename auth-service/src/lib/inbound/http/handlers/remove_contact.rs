use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use crate::domain::contact::models::Contact;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn remove_contact(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(contact): Path<String>,
) -> Result<ApiSuccess<()>, ApiError> {
    let contact = Contact::new(contact).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .auth_service
        .remove_contact(user.user_id, contact)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, ()))
}
