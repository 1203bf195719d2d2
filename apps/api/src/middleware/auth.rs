//! Bearer session authentication.
//!
//! Sessions are opaque v4 uuid tokens held in Postgres. Token issuance
//! happens in the user routes; this middleware validates the token and
//! stashes the owning user id as a request extension for handlers.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::session::SessionRow;
use crate::state::AppState;

/// The authenticated caller's user id, inserted by `require_auth`.
#[derive(Debug, Clone, Copy)]
pub struct AuthUserId(pub Uuid);

pub fn extract_bearer_token(req: &Request) -> Result<&str, AppError> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AppError::Unauthorized)?
        .to_str()
        .map_err(|_| AppError::Unauthorized)?;

    let parts: Vec<&str> = value.split_whitespace().collect();
    if parts.len() != 2 || parts[0] != "Bearer" {
        return Err(AppError::Unauthorized);
    }
    Ok(parts[1])
}

/// Rejects the request with 401 unless it carries a live session token.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(&req)?;
    let token: Uuid = token.parse().map_err(|_| AppError::Unauthorized)?;

    let session: Option<SessionRow> =
        sqlx::query_as("SELECT * FROM sessions WHERE token = $1")
            .bind(token)
            .fetch_optional(&state.db)
            .await?;

    let session = session.ok_or(AppError::Unauthorized)?;
    if session.expires_at <= Utc::now() {
        return Err(AppError::Unauthorized);
    }

    req.extensions_mut().insert(AuthUserId(session.user_id));
    Ok(next.run(req).await)
}
