//! Register and login endpoints issuing access tokens.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, verify_password, MIN_PASSWORD_LEN};
use crate::errors::{constraint_name, AppError, FieldErrors};
use crate::models::actor::ActorRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), AppError> {
    let mut errors = FieldErrors::new();
    if req.username.trim().is_empty() {
        errors.push("username", "This field may not be blank.");
    }
    if req.email.trim().is_empty() || !req.email.contains('@') {
        errors.push("email", "Enter a valid email address.");
    }
    if req.password.len() < MIN_PASSWORD_LEN {
        errors.push(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LEN} characters long."),
        );
    }
    errors.into_result()?;

    let password_hash =
        hash_password(&req.password).map_err(|e| anyhow::anyhow!("password hashing failed: {e}"))?;

    let actor: ActorRow = sqlx::query_as(
        r#"
        INSERT INTO actors (username, email, password_hash)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(req.username.trim())
    .bind(req.email.trim())
    .bind(&password_hash)
    .fetch_one(&state.db)
    .await
    .map_err(|e| match constraint_name(&e) {
        Some("actors_username_key") => {
            AppError::Validation(FieldErrors::single("username", "Username already taken."))
        }
        Some("actors_email_key") => {
            AppError::Validation(FieldErrors::single("email", "Email already registered."))
        }
        _ => AppError::Database(e),
    })?;

    tracing::info!(actor_id = %actor.id, "registered new actor");
    let token = issue_token(&state, &actor)?;
    Ok((StatusCode::CREATED, Json(token)))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let actor: Option<ActorRow> = sqlx::query_as("SELECT * FROM actors WHERE username = $1")
        .bind(&req.username)
        .fetch_optional(&state.db)
        .await?;

    // Same rejection for unknown username and wrong password.
    let actor = actor.ok_or(AppError::Unauthorized)?;
    let ok = verify_password(&req.password, &actor.password_hash)
        .map_err(|e| anyhow::anyhow!("stored password hash is malformed: {e}"))?;
    if !ok {
        return Err(AppError::Unauthorized);
    }

    Ok(Json(issue_token(&state, &actor)?))
}

fn issue_token(state: &AppState, actor: &ActorRow) -> Result<TokenResponse, AppError> {
    let access_token = generate_access_token(
        actor.id,
        actor.is_superuser,
        &state.config.jwt_secret,
        state.config.jwt_expiry_mins,
    )
    .map_err(|e| anyhow::anyhow!("token generation failed: {e}"))?;

    Ok(TokenResponse {
        access_token,
        token_type: "Bearer",
    })
}
