use axum::Router;
use shared_types::{
    AppError, AppErrorKind, AuthResponse, ClientResponse, CountyResponse, CreateClientRequest,
    CreateCountyRequest, CreateInvoiceRequest, CreateMessageRequest, CreateSessionRequest,
    ExportCountySummary, ExportKind, ExportPreview, ExportPreviewRow, ExportTotals,
    InvoiceResponse, MessageAck, MessageResponse, RequestLinkRequest, SendInvoiceRequest,
    SessionResponse, UpdateClientRequest, UpdateCountyRequest, UpdateInvoiceRequest,
    UpdateMessageRequest, UpdateSessionRequest, UpdateSettingsRequest, UserResponse,
};
use sqlx::{Pool, Postgres};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::db::AppState;
use crate::health;
use crate::rest;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation for the API.
#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        rest::auth::request_link,
        rest::auth::verify_link,
        // Account
        rest::account::get_account,
        rest::account::update_settings,
        // Counties
        rest::county::list_counties,
        rest::county::create_county,
        rest::county::get_county,
        rest::county::update_county,
        rest::county::delete_county,
        rest::export::export_county,
        // Invoices
        rest::invoice::list_invoices,
        rest::invoice::create_invoice,
        rest::invoice::get_invoice,
        rest::invoice::update_invoice,
        rest::invoice::delete_invoice,
        rest::invoice::send_invoice,
        // Clients
        rest::client::list_clients,
        rest::client::create_client,
        rest::client::get_client,
        rest::client::update_client,
        rest::client::delete_client,
        // Sessions
        rest::session::list_sessions,
        rest::session::create_session,
        rest::session::get_session,
        rest::session::update_session,
        rest::session::delete_session,
        // Messages
        rest::message::list_messages,
        rest::message::create_message,
        rest::message::get_message,
        rest::message::update_message,
        rest::message::mark_message_read,
        rest::message::delete_message,
        // Webhooks
        rest::webhook::mailgun_webhook,
        // Health
        health::health_check,
    ),
    components(schemas(
        AppError,
        AppErrorKind,
        AuthResponse,
        MessageAck,
        RequestLinkRequest,
        UserResponse,
        UpdateSettingsRequest,
        CountyResponse,
        CreateCountyRequest,
        UpdateCountyRequest,
        ExportPreview,
        ExportCountySummary,
        ExportPreviewRow,
        ExportTotals,
        ExportKind,
        InvoiceResponse,
        CreateInvoiceRequest,
        UpdateInvoiceRequest,
        SendInvoiceRequest,
        ClientResponse,
        CreateClientRequest,
        UpdateClientRequest,
        SessionResponse,
        CreateSessionRequest,
        UpdateSessionRequest,
        MessageResponse,
        CreateMessageRequest,
        UpdateMessageRequest,
        health::HealthResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Magic-link authentication endpoints"),
        (name = "account", description = "Account and settings endpoints"),
        (name = "counties", description = "County management endpoints"),
        (name = "export", description = "County report export"),
        (name = "invoices", description = "Invoice management endpoints"),
        (name = "clients", description = "Client management endpoints"),
        (name = "sessions", description = "Mediation session calendar endpoints"),
        (name = "messages", description = "Account message endpoints"),
        (name = "webhooks", description = "Webhook receivers"),
        (name = "health", description = "Health check endpoint")
    ),
    info(
        title = "Accordia API",
        description = "Mediator practice management and county reporting API",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;

/// Build an Axum router that serves the API docs at `/docs`
/// and the REST API at `/api/*`.
pub fn api_router(pool: Pool<Postgres>) -> Router {
    let state = AppState { pool };

    Router::new()
        .merge(rest::api_router())
        .route("/health", axum::routing::get(health::health_check))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
