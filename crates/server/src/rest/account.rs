use axum::{extract::State, Json};
use sqlx::{Pool, Postgres};

use crate::auth::AuthRequired;
use shared_types::{AppError, UpdateSettingsRequest, UserResponse};

// ---------------------------------------------------------------------------
// GET /api/account
// ---------------------------------------------------------------------------

/// Get the calling account.
#[utoipa::path(
    get,
    path = "/api/account",
    responses(
        (status = 200, description = "Account", body = UserResponse),
        (status = 401, description = "Not authenticated", body = AppError)
    ),
    security(("bearer_auth" = [])),
    tag = "account"
)]
pub async fn get_account(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
) -> Result<Json<UserResponse>, AppError> {
    let user = crate::repo::user::find_by_id(&pool, claims.sub)
        .await?
        .ok_or_else(|| AppError::not_found("Account not found"))?;

    Ok(Json(UserResponse::from(user)))
}

// ---------------------------------------------------------------------------
// PUT /api/account/settings
// ---------------------------------------------------------------------------

/// Update account settings. Omitted fields are left unchanged.
#[utoipa::path(
    put,
    path = "/api/account/settings",
    request_body = UpdateSettingsRequest,
    responses(
        (status = 200, description = "Settings updated", body = UserResponse),
        (status = 400, description = "Invalid request", body = AppError)
    ),
    security(("bearer_auth" = [])),
    tag = "account"
)]
pub async fn update_settings(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Json(body): Json<UpdateSettingsRequest>,
) -> Result<Json<UserResponse>, AppError> {
    if let Some(rate) = body.default_rate {
        if !rate.is_finite() || rate < 0.0 {
            return Err(AppError::bad_request(
                "Default rate must be a non-negative number",
            ));
        }
    }

    let user = crate::repo::user::update_settings(&pool, claims.sub, &body)
        .await?
        .ok_or_else(|| AppError::not_found("Account not found"))?;

    Ok(Json(UserResponse::from(user)))
}
