use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::entitlements::{can_export_resume, can_perform_action, ExportDecision, LimitKind};
use crate::errors::AppError;
use crate::middleware::auth::AuthUserId;
use crate::models::resume::ResumeRow;
use crate::routes::users::fetch_user;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateResumeRequest {
    pub title: String,
    #[serde(default)]
    pub data: Value,
}

#[derive(Deserialize)]
pub struct UpdateResumeRequest {
    pub title: Option<String>,
    pub data: Option<Value>,
}

/// POST /api/resumes
///
/// Creation is limit-checked server-side: the caller's effective plan must
/// still have room under its `resumes` limit, counted fresh from the
/// database on every request.
pub async fn handle_create_resume(
    State(state): State<AppState>,
    Extension(AuthUserId(user_id)): Extension<AuthUserId>,
    Json(req): Json<CreateResumeRequest>,
) -> Result<(StatusCode, Json<ResumeRow>), AppError> {
    if req.title.trim().is_empty() {
        return Err(AppError::Validation("Missing required fields".to_string()));
    }

    let user = fetch_user(&state, user_id).await?;
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM resumes WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(&state.db)
        .await?;

    let decision = can_perform_action(
        state.config.admin_email(),
        Some(&user.as_subject()),
        LimitKind::Resumes,
        count,
    );
    if !decision.allowed {
        return Err(AppError::UpgradeRequired(
            decision.reason.unwrap_or_default(),
        ));
    }

    let data = if req.data.is_null() { json!({}) } else { req.data };
    let resume: ResumeRow = sqlx::query_as(
        r#"
        INSERT INTO resumes (id, user_id, title, data)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(req.title.trim())
    .bind(data)
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(resume)))
}

/// GET /api/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Extension(AuthUserId(user_id)): Extension<AuthUserId>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResumeRow>, AppError> {
    Ok(Json(fetch_owned_resume(&state, user_id, id).await?))
}

/// PUT /api/resumes/:id
pub async fn handle_update_resume(
    State(state): State<AppState>,
    Extension(AuthUserId(user_id)): Extension<AuthUserId>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateResumeRequest>,
) -> Result<Json<ResumeRow>, AppError> {
    // Ownership check before touching the row.
    fetch_owned_resume(&state, user_id, id).await?;

    let resume: ResumeRow = sqlx::query_as(
        r#"
        UPDATE resumes
        SET title = COALESCE($3, title),
            data = COALESCE($4, data),
            updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(req.title)
    .bind(req.data)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(resume))
}

/// DELETE /api/resumes/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Extension(AuthUserId(user_id)): Extension<AuthUserId>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    fetch_owned_resume(&state, user_id, id).await?;

    sqlx::query("DELETE FROM resumes WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(&state.db)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResponse {
    #[serde(flatten)]
    pub decision: ExportDecision,
    pub resume: ResumeRow,
}

/// GET /api/resumes/:id/export
///
/// Never denied: free-tier exports carry the watermark flag, paid tiers
/// export clean. The client renders accordingly.
pub async fn handle_export_resume(
    State(state): State<AppState>,
    Extension(AuthUserId(user_id)): Extension<AuthUserId>,
    Path(id): Path<Uuid>,
) -> Result<Json<ExportResponse>, AppError> {
    let resume = fetch_owned_resume(&state, user_id, id).await?;
    let user = fetch_user(&state, user_id).await?;
    let decision = can_export_resume(state.config.admin_email(), Some(&user.as_subject()));

    Ok(Json(ExportResponse { decision, resume }))
}

async fn fetch_owned_resume(
    state: &AppState,
    user_id: Uuid,
    id: Uuid,
) -> Result<ResumeRow, AppError> {
    let resume: Option<ResumeRow> =
        sqlx::query_as("SELECT * FROM resumes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&state.db)
            .await?;
    resume.ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))
}
