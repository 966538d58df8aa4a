use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::{Pool, Postgres};

use crate::auth::AuthRequired;
use shared_types::{AppError, CreateMessageRequest, MessageResponse, UpdateMessageRequest};

use super::parse_uuid;

/// List the caller's messages, newest first.
#[utoipa::path(
    get,
    path = "/api/messages",
    responses(
        (status = 200, description = "Message list", body = Vec<MessageResponse>)
    ),
    security(("bearer_auth" = [])),
    tag = "messages"
)]
pub async fn list_messages(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
) -> Result<Json<Vec<MessageResponse>>, AppError> {
    let messages = crate::repo::message::list_by_owner(&pool, claims.sub).await?;
    let response: Vec<MessageResponse> = messages.into_iter().map(MessageResponse::from).collect();
    Ok(Json(response))
}

/// Create a message.
#[utoipa::path(
    post,
    path = "/api/messages",
    request_body = CreateMessageRequest,
    responses(
        (status = 201, description = "Message created", body = MessageResponse),
        (status = 400, description = "Invalid request", body = AppError)
    ),
    security(("bearer_auth" = [])),
    tag = "messages"
)]
pub async fn create_message(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Json(body): Json<CreateMessageRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    if body.subject.trim().is_empty() {
        return Err(AppError::bad_request("Subject cannot be empty"));
    }

    let message = crate::repo::message::create(&pool, claims.sub, &body).await?;

    Ok((StatusCode::CREATED, Json(MessageResponse::from(message))))
}

/// Get a single message by ID.
#[utoipa::path(
    get,
    path = "/api/messages/{id}",
    params(("id" = String, Path, description = "Message UUID")),
    responses(
        (status = 200, description = "Message found", body = MessageResponse),
        (status = 404, description = "Not found", body = AppError)
    ),
    security(("bearer_auth" = [])),
    tag = "messages"
)]
pub async fn get_message(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let uuid = parse_uuid(&id)?;

    let message = crate::repo::message::find_by_id(&pool, claims.sub, uuid)
        .await?
        .ok_or_else(|| AppError::not_found("Message not found"))?;

    Ok(Json(MessageResponse::from(message)))
}

/// Update a message. Omitted fields are left unchanged.
#[utoipa::path(
    put,
    path = "/api/messages/{id}",
    params(("id" = String, Path, description = "Message UUID")),
    request_body = UpdateMessageRequest,
    responses(
        (status = 200, description = "Message updated", body = MessageResponse),
        (status = 404, description = "Not found", body = AppError)
    ),
    security(("bearer_auth" = [])),
    tag = "messages"
)]
pub async fn update_message(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Path(id): Path<String>,
    Json(body): Json<UpdateMessageRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let uuid = parse_uuid(&id)?;

    if let Some(subject) = &body.subject {
        if subject.trim().is_empty() {
            return Err(AppError::bad_request("Subject cannot be empty"));
        }
    }

    let message = crate::repo::message::update(&pool, claims.sub, uuid, &body)
        .await?
        .ok_or_else(|| AppError::not_found("Message not found"))?;

    Ok(Json(MessageResponse::from(message)))
}

/// Mark a message as read.
#[utoipa::path(
    post,
    path = "/api/messages/{id}/read",
    params(("id" = String, Path, description = "Message UUID")),
    responses(
        (status = 200, description = "Message marked read", body = MessageResponse),
        (status = 404, description = "Not found", body = AppError)
    ),
    security(("bearer_auth" = [])),
    tag = "messages"
)]
pub async fn mark_message_read(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let uuid = parse_uuid(&id)?;

    let message = crate::repo::message::mark_read(&pool, claims.sub, uuid)
        .await?
        .ok_or_else(|| AppError::not_found("Message not found"))?;

    Ok(Json(MessageResponse::from(message)))
}

/// Delete a message.
#[utoipa::path(
    delete,
    path = "/api/messages/{id}",
    params(("id" = String, Path, description = "Message UUID")),
    responses(
        (status = 204, description = "Message deleted"),
        (status = 404, description = "Not found", body = AppError)
    ),
    security(("bearer_auth" = [])),
    tag = "messages"
)]
pub async fn delete_message(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let uuid = parse_uuid(&id)?;

    let deleted = crate::repo::message::delete(&pool, claims.sub, uuid).await?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Message not found"))
    }
}
