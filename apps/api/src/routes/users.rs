use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::middleware::auth::AuthUserId;
use crate::models::resume::ResumeRow;
use crate::models::user::{PublicUser, UserRow};
use crate::state::AppState;

const SESSION_TTL_DAYS: i64 = 7;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub token: Uuid,
    pub user: PublicUser,
}

/// POST /api/users/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    if req.name.trim().is_empty() || req.email.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::Validation("Missing required fields".to_string()));
    }

    let existing: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(&req.email)
        .fetch_optional(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::Validation("User already exists".to_string()));
    }

    let user: UserRow = sqlx::query_as(
        r#"
        INSERT INTO users (id, name, email, password_hash, plan, is_premium)
        VALUES ($1, $2, $3, $4, 'free', FALSE)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(req.name.trim())
    .bind(&req.email)
    .bind(hash_password(&req.password))
    .fetch_one(&state.db)
    .await?;

    let token = create_session(&state, user.id).await?;
    tracing::info!(user_id = %user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User created successfully".to_string(),
            token,
            user: PublicUser::from_row(&user, state.config.admin_email()),
        }),
    ))
}

/// POST /api/users/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let user: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(&req.email)
        .fetch_optional(&state.db)
        .await?;

    // Same message for unknown email and bad password.
    let invalid = || AppError::Validation("Invalid email or password".to_string());
    let user = user.ok_or_else(invalid)?;
    if !verify_password(&req.password, &user.password_hash) {
        return Err(invalid());
    }

    let token = create_session(&state, user.id).await?;

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        token,
        user: PublicUser::from_row(&user, state.config.admin_email()),
    }))
}

#[derive(Serialize)]
pub struct UserDataResponse {
    pub user: PublicUser,
}

/// GET /api/users/data
pub async fn handle_user_data(
    State(state): State<AppState>,
    Extension(AuthUserId(user_id)): Extension<AuthUserId>,
) -> Result<Json<UserDataResponse>, AppError> {
    let user = fetch_user(&state, user_id).await?;
    Ok(Json(UserDataResponse {
        user: PublicUser::from_row(&user, state.config.admin_email()),
    }))
}

#[derive(Serialize)]
pub struct UserResumesResponse {
    pub resumes: Vec<ResumeRow>,
}

/// GET /api/users/resumes
pub async fn handle_user_resumes(
    State(state): State<AppState>,
    Extension(AuthUserId(user_id)): Extension<AuthUserId>,
) -> Result<Json<UserResumesResponse>, AppError> {
    let resumes: Vec<ResumeRow> =
        sqlx::query_as("SELECT * FROM resumes WHERE user_id = $1 ORDER BY updated_at DESC")
            .bind(user_id)
            .fetch_all(&state.db)
            .await?;
    Ok(Json(UserResumesResponse { resumes }))
}

pub async fn fetch_user(state: &AppState, user_id: Uuid) -> Result<UserRow, AppError> {
    let user: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&state.db)
        .await?;
    user.ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

async fn create_session(state: &AppState, user_id: Uuid) -> Result<Uuid, AppError> {
    let token = Uuid::new_v4();
    sqlx::query("INSERT INTO sessions (token, user_id, expires_at) VALUES ($1, $2, $3)")
        .bind(token)
        .bind(user_id)
        .bind(Utc::now() + Duration::days(SESSION_TTL_DAYS))
        .execute(&state.db)
        .await?;
    Ok(token)
}

/// Salted BLAKE3, stored as `salt$hex`. Password mechanics beyond "don't
/// store plaintext" are outside this service's scope.
fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    let digest = blake3::hash(format!("{salt}:{password}").as_bytes());
    format!("{salt}${}", digest.to_hex())
}

fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt, digest)) = stored.split_once('$') else {
        return false;
    };
    blake3::hash(format!("{salt}:{password}").as_bytes())
        .to_hex()
        .as_str()
        == digest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_round_trip() {
        let stored = hash_password("hunter2");
        assert!(verify_password("hunter2", &stored));
        assert!(!verify_password("hunter3", &stored));
    }

    #[test]
    fn test_password_hashes_are_salted() {
        assert_ne!(hash_password("hunter2"), hash_password("hunter2"));
    }

    #[test]
    fn test_verify_rejects_malformed_stored_value() {
        assert!(!verify_password("hunter2", "no-separator-here"));
        assert!(!verify_password("hunter2", ""));
    }
}
