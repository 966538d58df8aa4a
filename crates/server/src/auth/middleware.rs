use axum::extract::Request;
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use super::jwt::validate_access_token;

/// Permissive auth middleware.
///
/// Validates the `Authorization: Bearer` token, if present, and inserts the
/// decoded `Claims` into request extensions. Does NOT reject
/// unauthenticated requests; the `AuthRequired` extractor does that per
/// route.
pub async fn auth_middleware(mut req: Request, next: Next) -> Response {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_owned);

    if let Some(token) = token {
        if let Ok(claims) = validate_access_token(&token) {
            req.extensions_mut().insert(claims);
        }
    }

    next.run(req).await
}
