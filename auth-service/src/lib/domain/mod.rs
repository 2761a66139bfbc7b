pub mod auth;
pub mod contact;
pub mod nonce;
pub mod token;
pub mod user;
