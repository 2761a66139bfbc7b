use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::patch;
use axum::routing::post;
use axum::Router;
use signer::TokenSigner;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::add_contact::add_contact;
use super::handlers::delete_user::delete_user;
use super::handlers::exchange_nonce::exchange_nonce;
use super::handlers::get_user::get_user;
use super::handlers::refresh_token::refresh_token;
use super::handlers::remove_contact::remove_contact;
use super::handlers::revoke::revoke;
use super::handlers::send_nonce::send_nonce;
use super::handlers::update_user::update_user;
use super::handlers::validate_token::validate_token;
use super::middleware::authenticate as auth_middleware;
use crate::domain::auth::ports::AuthServicePort;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthServicePort>,
    pub token_signer: Arc<TokenSigner>,
}

pub fn create_router(
    auth_service: Arc<dyn AuthServicePort>,
    token_signer: Arc<TokenSigner>,
) -> Router {
    let state = AppState {
        auth_service,
        token_signer,
    };

    let public_routes = Router::new()
        .route("/api/auth/send-nonce", post(send_nonce))
        .route("/api/auth/exchange-nonce", post(exchange_nonce))
        .route("/api/auth/refresh", post(refresh_token));

    let protected_routes = Router::new()
        .route("/api/auth/add-contact", post(add_contact))
        .route("/api/auth/revoke", post(revoke))
        .route("/api/auth/validate", get(validate_token))
        .route("/api/contacts/:contact", delete(remove_contact))
        .route("/api/users/me", get(get_user))
        .route("/api/users/me", patch(update_user))
        .route("/api/users/me", delete(delete_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
                headers = ?request.headers(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
