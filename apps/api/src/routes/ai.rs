use axum::{
    extract::{Multipart, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::ai::ats::{score_resume, AtsReport};
use crate::ai::prompts::{ENHANCE_JOB_DESC_SYSTEM, ENHANCE_SUMMARY_SYSTEM, PARSE_RESUME_SYSTEM};
use crate::errors::AppError;
use crate::middleware::auth::AuthUserId;
use crate::models::resume::ResumeRow;
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhanceRequest {
    pub user_content: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhanceResponse {
    pub enhanced_content: String,
}

/// POST /api/ai/enhance-pro-sum (premium-gated by middleware)
pub async fn handle_enhance_summary(
    State(state): State<AppState>,
    Json(req): Json<EnhanceRequest>,
) -> Result<Json<EnhanceResponse>, AppError> {
    enhance(&state, ENHANCE_SUMMARY_SYSTEM, &req.user_content).await
}

/// POST /api/ai/enhance-job-desc (premium-gated by middleware — this is
/// the job-tailoring feature)
pub async fn handle_enhance_job_desc(
    State(state): State<AppState>,
    Json(req): Json<EnhanceRequest>,
) -> Result<Json<EnhanceResponse>, AppError> {
    enhance(&state, ENHANCE_JOB_DESC_SYSTEM, &req.user_content).await
}

async fn enhance(
    state: &AppState,
    system: &str,
    user_content: &str,
) -> Result<Json<EnhanceResponse>, AppError> {
    if user_content.trim().is_empty() {
        return Err(AppError::Validation("Missing required fields".to_string()));
    }
    let enhanced_content = state
        .llm
        .complete(system, user_content)
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;
    Ok(Json(EnhanceResponse { enhanced_content }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtsScoreRequest {
    pub resume_data: Value,
}

/// POST /api/ai/ats-score (premium-gated by middleware)
///
/// Deterministic rubric scoring; no LLM call, so repeated requests on the
/// same resume give the same score.
pub async fn handle_ats_score(
    Json(req): Json<AtsScoreRequest>,
) -> Result<Json<AtsReport>, AppError> {
    if req.resume_data.is_null() {
        return Err(AppError::Validation("Missing required fields".to_string()));
    }
    Ok(Json(score_resume(&req.resume_data)))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResumeResponse {
    pub resume_id: Uuid,
}

/// POST /api/ai/upload-resume (authenticated, not premium-gated)
///
/// Multipart upload: a `file` part with the PDF and a `title` part. The
/// text is extracted locally, structured by the LLM, and stored as a new
/// resume document.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Extension(AuthUserId(user_id)): Extension<AuthUserId>,
    mut multipart: Multipart,
) -> Result<Json<UploadResumeResponse>, AppError> {
    let mut title: Option<String> = None;
    let mut file: Option<bytes::Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        match field.name() {
            Some("title") => {
                title = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::Validation(e.to_string()))?,
                );
            }
            Some("file") => {
                file = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| AppError::Validation(e.to_string()))?,
                );
            }
            _ => {}
        }
    }

    let title = title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Missing required fields".to_string()))?;
    let file = file.ok_or_else(|| AppError::Validation("Missing required fields".to_string()))?;

    // pdf-extract is CPU-bound; keep it off the async runtime.
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&file))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?
        .map_err(|e| AppError::Validation(format!("Could not read PDF: {e}")))?;

    if text.trim().is_empty() {
        return Err(AppError::Validation(
            "PDF contains no extractable text".to_string(),
        ));
    }

    let parsed: Value = state
        .llm
        .complete_json(PARSE_RESUME_SYSTEM, &text)
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;

    let resume: ResumeRow = sqlx::query_as(
        r#"
        INSERT INTO resumes (id, user_id, title, data)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(title.trim())
    .bind(parsed)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(UploadResumeResponse {
        resume_id: resume.id,
    }))
}
