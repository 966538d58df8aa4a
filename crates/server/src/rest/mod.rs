pub mod account;
pub mod auth;
pub mod client;
pub mod county;
pub mod export;
pub mod invoice;
pub mod message;
pub mod session;
pub mod webhook;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::db::AppState;

/// Build the REST API router. Every handler under `/api` except the auth
/// and webhook endpoints requires a bearer token; scoping to the token's
/// owner happens inside the handlers via [`crate::auth::AuthRequired`].
pub fn api_router() -> Router<AppState> {
    Router::new()
        // Auth (magic link)
        .route("/api/auth/request-link", post(auth::request_link))
        .route("/api/auth/verify", get(auth::verify_link))
        // Account
        .route("/api/account", get(account::get_account))
        .route("/api/account/settings", put(account::update_settings))
        // Counties
        .route(
            "/api/counties",
            get(county::list_counties).post(county::create_county),
        )
        .route(
            "/api/counties/{id}",
            get(county::get_county)
                .put(county::update_county)
                .delete(county::delete_county),
        )
        .route("/api/counties/{id}/export", get(export::export_county))
        // Invoices
        .route(
            "/api/invoices",
            get(invoice::list_invoices).post(invoice::create_invoice),
        )
        .route(
            "/api/invoices/{id}",
            get(invoice::get_invoice)
                .put(invoice::update_invoice)
                .delete(invoice::delete_invoice),
        )
        .route("/api/invoices/{id}/send", post(invoice::send_invoice))
        // Clients
        .route(
            "/api/clients",
            get(client::list_clients).post(client::create_client),
        )
        .route(
            "/api/clients/{id}",
            get(client::get_client)
                .put(client::update_client)
                .delete(client::delete_client),
        )
        // Sessions
        .route(
            "/api/sessions",
            get(session::list_sessions).post(session::create_session),
        )
        .route(
            "/api/sessions/{id}",
            get(session::get_session)
                .put(session::update_session)
                .delete(session::delete_session),
        )
        // Messages
        .route(
            "/api/messages",
            get(message::list_messages).post(message::create_message),
        )
        .route("/api/messages/{id}/read", post(message::mark_message_read))
        .route(
            "/api/messages/{id}",
            get(message::get_message)
                .put(message::update_message)
                .delete(message::delete_message),
        )
        // Provider webhooks (signature-verified, not bearer-authenticated)
        .route("/api/webhooks/mailgun", post(webhook::mailgun_webhook))
}

/// Parse a path segment as a UUID, rejecting malformed input early with a
/// 400 rather than a confusing 404.
pub(crate) fn parse_uuid(id: &str) -> Result<uuid::Uuid, shared_types::AppError> {
    uuid::Uuid::parse_str(id).map_err(|_| shared_types::AppError::bad_request("Invalid UUID format"))
}
