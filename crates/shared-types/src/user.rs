use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A mediator account. Created implicitly the first time a magic link for
/// the email address is verified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub default_rate: Option<f64>,
    pub timezone: Option<String>,
    pub email_bounced: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub default_rate: Option<f64>,
    pub timezone: Option<String>,
    pub email_bounced: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            display_name: u.display_name,
            default_rate: u.default_rate,
            timezone: u.timezone,
            email_bounced: u.email_bounced,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateSettingsRequest {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub default_rate: Option<f64>,
    #[serde(default)]
    pub timezone: Option<String>,
}

/// Request body for `POST /api/auth/request-link`.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(validator::Validate))]
pub struct RequestLinkRequest {
    #[cfg_attr(feature = "validation", validate(email(message = "Invalid email address")))]
    pub email: String,
}

/// Response for a successful magic-link verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AuthResponse {
    pub access_token: String,
    pub user: UserResponse,
}

/// Generic `{ "message": ... }` acknowledgement body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MessageAck {
    pub message: String,
}
