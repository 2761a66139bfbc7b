use crate::domain::token::models::RefreshSecret;
use crate::domain::user::models::UserId;

/// Result of a successful nonce exchange: the resolved (or freshly created)
/// user and a refresh token for them.
#[derive(Debug, Clone)]
pub struct RefreshGrant {
    pub user_id: UserId,
    pub refresh_token: RefreshSecret,
}
