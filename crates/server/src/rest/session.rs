use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::{Pool, Postgres};

use crate::auth::AuthRequired;
use shared_types::{AppError, CreateSessionRequest, SessionResponse, UpdateSessionRequest};

use super::parse_uuid;

/// List the caller's sessions, soonest first.
#[utoipa::path(
    get,
    path = "/api/sessions",
    responses(
        (status = 200, description = "Session list", body = Vec<SessionResponse>)
    ),
    security(("bearer_auth" = [])),
    tag = "sessions"
)]
pub async fn list_sessions(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
) -> Result<Json<Vec<SessionResponse>>, AppError> {
    let sessions = crate::repo::session::list_by_owner(&pool, claims.sub).await?;
    let response: Vec<SessionResponse> = sessions.into_iter().map(SessionResponse::from).collect();
    Ok(Json(response))
}

/// Schedule a session.
#[utoipa::path(
    post,
    path = "/api/sessions",
    request_body = CreateSessionRequest,
    responses(
        (status = 201, description = "Session created", body = SessionResponse),
        (status = 400, description = "Invalid request", body = AppError)
    ),
    security(("bearer_auth" = [])),
    tag = "sessions"
)]
pub async fn create_session(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Json(body): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    if body.title.trim().is_empty() {
        return Err(AppError::bad_request("Session title cannot be empty"));
    }
    if let Some(ends_at) = body.ends_at {
        if ends_at <= body.starts_at {
            return Err(AppError::bad_request("Session must end after it starts"));
        }
    }

    if let Some(client_id) = body.client_id {
        crate::repo::client::find_by_id(&pool, claims.sub, client_id)
            .await?
            .ok_or_else(|| AppError::bad_request("Unknown client"))?;
    }

    let session = crate::repo::session::create(&pool, claims.sub, &body).await?;

    Ok((StatusCode::CREATED, Json(SessionResponse::from(session))))
}

/// Get a single session by ID.
#[utoipa::path(
    get,
    path = "/api/sessions/{id}",
    params(("id" = String, Path, description = "Session UUID")),
    responses(
        (status = 200, description = "Session found", body = SessionResponse),
        (status = 404, description = "Not found", body = AppError)
    ),
    security(("bearer_auth" = [])),
    tag = "sessions"
)]
pub async fn get_session(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let uuid = parse_uuid(&id)?;

    let session = crate::repo::session::find_by_id(&pool, claims.sub, uuid)
        .await?
        .ok_or_else(|| AppError::not_found("Session not found"))?;

    Ok(Json(SessionResponse::from(session)))
}

/// Update a session. Omitted fields are left unchanged.
#[utoipa::path(
    put,
    path = "/api/sessions/{id}",
    params(("id" = String, Path, description = "Session UUID")),
    request_body = UpdateSessionRequest,
    responses(
        (status = 200, description = "Session updated", body = SessionResponse),
        (status = 404, description = "Not found", body = AppError)
    ),
    security(("bearer_auth" = [])),
    tag = "sessions"
)]
pub async fn update_session(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Path(id): Path<String>,
    Json(body): Json<UpdateSessionRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let uuid = parse_uuid(&id)?;

    if let Some(client_id) = body.client_id {
        crate::repo::client::find_by_id(&pool, claims.sub, client_id)
            .await?
            .ok_or_else(|| AppError::bad_request("Unknown client"))?;
    }

    let session = crate::repo::session::update(&pool, claims.sub, uuid, &body)
        .await?
        .ok_or_else(|| AppError::not_found("Session not found"))?;

    Ok(Json(SessionResponse::from(session)))
}

/// Delete a session.
#[utoipa::path(
    delete,
    path = "/api/sessions/{id}",
    params(("id" = String, Path, description = "Session UUID")),
    responses(
        (status = 204, description = "Session deleted"),
        (status = 404, description = "Not found", body = AppError)
    ),
    security(("bearer_auth" = [])),
    tag = "sessions"
)]
pub async fn delete_session(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let uuid = parse_uuid(&id)?;

    let deleted = crate::repo::session::delete(&pool, claims.sub, uuid).await?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Session not found"))
    }
}
