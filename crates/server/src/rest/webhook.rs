use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use sqlx::{Pool, Postgres};

use crate::mailgun;

// ---------------------------------------------------------------------------
// Mailgun webhook payload
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct MailgunWebhookPayload {
    pub signature: MailgunSignature,
    #[serde(rename = "event-data")]
    pub event_data: MailgunEventData,
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct MailgunSignature {
    pub timestamp: String,
    pub token: String,
    pub signature: String,
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct MailgunEventData {
    pub event: String,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub recipient: Option<String>,
}

fn webhook_signing_key() -> Result<String, String> {
    std::env::var("MAILGUN_WEBHOOK_SIGNING_KEY")
        .map_err(|_| "MAILGUN_WEBHOOK_SIGNING_KEY not set".to_string())
}

// ---------------------------------------------------------------------------
// POST /api/webhooks/mailgun
// ---------------------------------------------------------------------------

/// Mailgun delivery event webhook.
///
/// Always returns 200 on processing problems to prevent provider retry
/// storms; only a bad signature is rejected so Mailgun disables a
/// misconfigured endpoint instead of retrying forever. A permanent
/// delivery failure flags the recipient's account.
#[utoipa::path(
    post,
    path = "/api/webhooks/mailgun",
    responses(
        (status = 200, description = "Event accepted"),
        (status = 401, description = "Signature verification failed")
    ),
    tag = "webhooks"
)]
#[tracing::instrument(skip(pool, payload))]
pub async fn mailgun_webhook(
    State(pool): State<Pool<Postgres>>,
    Json(payload): Json<MailgunWebhookPayload>,
) -> StatusCode {
    let signing_key = match webhook_signing_key() {
        Ok(key) => key,
        Err(e) => {
            tracing::error!(error = %e, "Mailgun webhook signing key not configured");
            return StatusCode::OK;
        }
    };

    let sig = &payload.signature;
    if !mailgun::verify_webhook_signature(&signing_key, &sig.timestamp, &sig.token, &sig.signature)
    {
        tracing::warn!("Mailgun webhook signature verification failed");
        return StatusCode::UNAUTHORIZED;
    }

    let event = &payload.event_data;
    let permanent_failure =
        event.event == "failed" && event.severity.as_deref() == Some("permanent");

    if permanent_failure {
        if let Some(recipient) = event.recipient.as_deref() {
            mailgun::handle_bounce_event(&pool, recipient).await;
            tracing::info!(recipient = recipient, "Recorded permanent delivery failure");
        }
    }

    StatusCode::OK
}
