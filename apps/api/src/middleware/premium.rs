//! Server-side premium enforcement.
//!
//! The security boundary for ATS scoring and job tailoring. Any client-side
//! gating is advisory UX only; this middleware re-fetches the user and
//! re-resolves the premium flag on every request — entitlement decisions
//! are never cached, since the admin email, plan, and premium flag can all
//! change between requests.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::entitlements::premium_flag;
use crate::errors::AppError;
use crate::middleware::auth::AuthUserId;
use crate::models::user::UserRow;
use crate::state::AppState;

/// Responds 403 `{ message, requiresUpgrade: true }` unless the caller has
/// premium access (stored flag or admin override). Runs after `require_auth`.
pub async fn require_premium_access(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let AuthUserId(user_id) = *req
        .extensions()
        .get::<AuthUserId>()
        .ok_or(AppError::Unauthorized)?;

    let user: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&state.db)
        .await?;

    let user = user.ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if !premium_flag(state.config.admin_email(), Some(&user.as_subject())) {
        tracing::debug!(user_id = %user_id, "premium access denied");
        return Err(AppError::UpgradeRequired(
            "Premium access required. This feature requires a premium subscription.".to_string(),
        ));
    }

    Ok(next.run(req).await)
}
