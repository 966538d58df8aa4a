use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use sqlx::{Pool, Postgres};

use crate::auth::{jwt, magic_link};
use crate::error_convert::ValidateRequest;
use shared_types::{AppError, AuthResponse, MessageAck, RequestLinkRequest, UserResponse};

// ---------------------------------------------------------------------------
// POST /api/auth/request-link
// ---------------------------------------------------------------------------

/// Request a sign-in link by email.
///
/// Always acknowledges with the same body for a syntactically valid
/// address, whether or not an account exists, so the endpoint cannot be
/// used to probe for registered emails.
#[utoipa::path(
    post,
    path = "/api/auth/request-link",
    request_body = RequestLinkRequest,
    responses(
        (status = 200, description = "Link requested", body = MessageAck),
        (status = 422, description = "Invalid email address", body = AppError)
    ),
    tag = "auth"
)]
pub async fn request_link(
    State(pool): State<Pool<Postgres>>,
    Json(body): Json<RequestLinkRequest>,
) -> Result<Json<MessageAck>, AppError> {
    body.validate_request()?;
    let email = body.email.trim().to_lowercase();

    let token = magic_link::create_login_token(&pool, &email).await?;

    // Fire-and-forget: delivery failures are logged, not surfaced.
    if crate::config::feature_flags().mailgun {
        tokio::spawn(async move {
            crate::mailgun::send_login_link_email(&email, &token).await;
        });
    } else {
        tracing::info!(email = %email, "Mailgun disabled; skipping sign-in email");
    }

    Ok(Json(MessageAck {
        message: "If that address is valid, a sign-in link is on its way".to_string(),
    }))
}

// ---------------------------------------------------------------------------
// GET /api/auth/verify
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, utoipa::IntoParams)]
pub struct VerifyParams {
    pub token: String,
}

/// Complete a magic-link sign-in and receive an access token.
#[utoipa::path(
    get,
    path = "/api/auth/verify",
    params(VerifyParams),
    responses(
        (status = 200, description = "Signed in", body = AuthResponse),
        (status = 401, description = "Invalid or expired link", body = AppError)
    ),
    tag = "auth"
)]
pub async fn verify_link(
    State(pool): State<Pool<Postgres>>,
    Query(params): Query<VerifyParams>,
) -> Result<Json<AuthResponse>, AppError> {
    let user = magic_link::verify_login_token(&pool, &params.token).await?;

    let access_token = jwt::create_access_token(user.id, &user.email)
        .map_err(|e| AppError::internal(format!("Failed to issue access token: {e}")))?;

    Ok(Json(AuthResponse {
        access_token,
        user: UserResponse::from(user),
    }))
}
