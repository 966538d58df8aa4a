use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::{Pool, Postgres};

use crate::auth::AuthRequired;
use shared_types::{AppError, ClientResponse, CreateClientRequest, UpdateClientRequest};

use super::parse_uuid;

/// List the caller's clients, alphabetically.
#[utoipa::path(
    get,
    path = "/api/clients",
    responses(
        (status = 200, description = "Client list", body = Vec<ClientResponse>)
    ),
    security(("bearer_auth" = [])),
    tag = "clients"
)]
pub async fn list_clients(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
) -> Result<Json<Vec<ClientResponse>>, AppError> {
    let clients = crate::repo::client::list_by_owner(&pool, claims.sub).await?;
    let response: Vec<ClientResponse> = clients.into_iter().map(ClientResponse::from).collect();
    Ok(Json(response))
}

/// Create a client.
#[utoipa::path(
    post,
    path = "/api/clients",
    request_body = CreateClientRequest,
    responses(
        (status = 201, description = "Client created", body = ClientResponse),
        (status = 400, description = "Invalid request", body = AppError)
    ),
    security(("bearer_auth" = [])),
    tag = "clients"
)]
pub async fn create_client(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Json(body): Json<CreateClientRequest>,
) -> Result<(StatusCode, Json<ClientResponse>), AppError> {
    if body.name.trim().is_empty() {
        return Err(AppError::bad_request("Client name cannot be empty"));
    }

    let client = crate::repo::client::create(&pool, claims.sub, &body).await?;

    Ok((StatusCode::CREATED, Json(ClientResponse::from(client))))
}

/// Get a single client by ID.
#[utoipa::path(
    get,
    path = "/api/clients/{id}",
    params(("id" = String, Path, description = "Client UUID")),
    responses(
        (status = 200, description = "Client found", body = ClientResponse),
        (status = 404, description = "Not found", body = AppError)
    ),
    security(("bearer_auth" = [])),
    tag = "clients"
)]
pub async fn get_client(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Path(id): Path<String>,
) -> Result<Json<ClientResponse>, AppError> {
    let uuid = parse_uuid(&id)?;

    let client = crate::repo::client::find_by_id(&pool, claims.sub, uuid)
        .await?
        .ok_or_else(|| AppError::not_found("Client not found"))?;

    Ok(Json(ClientResponse::from(client)))
}

/// Update a client. Omitted fields are left unchanged.
#[utoipa::path(
    put,
    path = "/api/clients/{id}",
    params(("id" = String, Path, description = "Client UUID")),
    request_body = UpdateClientRequest,
    responses(
        (status = 200, description = "Client updated", body = ClientResponse),
        (status = 404, description = "Not found", body = AppError)
    ),
    security(("bearer_auth" = [])),
    tag = "clients"
)]
pub async fn update_client(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Path(id): Path<String>,
    Json(body): Json<UpdateClientRequest>,
) -> Result<Json<ClientResponse>, AppError> {
    let uuid = parse_uuid(&id)?;

    let client = crate::repo::client::update(&pool, claims.sub, uuid, &body)
        .await?
        .ok_or_else(|| AppError::not_found("Client not found"))?;

    Ok(Json(ClientResponse::from(client)))
}

/// Delete a client.
#[utoipa::path(
    delete,
    path = "/api/clients/{id}",
    params(("id" = String, Path, description = "Client UUID")),
    responses(
        (status = 204, description = "Client deleted"),
        (status = 404, description = "Not found", body = AppError)
    ),
    security(("bearer_auth" = [])),
    tag = "clients"
)]
pub async fn delete_client(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let uuid = parse_uuid(&id)?;

    let deleted = crate::repo::client::delete(&pool, claims.sub, uuid).await?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Client not found"))
    }
}
