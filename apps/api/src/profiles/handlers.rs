//! Profile endpoints, all scoped to the caller's own identity.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::extract::AuthActor;
use crate::auth::password::{hash_password, verify_password, MIN_PASSWORD_LEN};
use crate::errors::{AppError, FieldErrors};
use crate::models::actor::ActorRow;
use crate::models::profile::{Area, AvailabilityType, ProfileDetail};
use crate::profiles::store::{self, NewProfile, ProfilePatch};
use crate::state::AppState;

/// Inbound profile payload. Choice fields arrive as raw strings so every
/// invalid field is reported together. Email/username are actor fields and
/// read-only through this surface; they are simply not accepted here.
#[derive(Debug, Default, Deserialize)]
pub struct ProfilePayload {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub linkedin_url: Option<String>,
    pub job_title: Option<String>,
    pub area: Option<String>,
    pub country: Option<String>,
    pub availability_type: Option<String>,
}

/// GET /api/v1/profile
pub async fn get_profile(
    State(state): State<AppState>,
    actor: AuthActor,
) -> Result<Json<ProfileDetail>, AppError> {
    let row = store::active_profile_with_actor(&state.db, actor.actor_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;
    let preferences = store::preferences_for_profile(&state.db, row.id).await?;
    Ok(Json(ProfileDetail::from_row(row, preferences)))
}

/// POST /api/v1/profile
///
/// One active profile per actor: creating a second is a conflict.
pub async fn create_profile(
    State(state): State<AppState>,
    actor: AuthActor,
    Json(payload): Json<ProfilePayload>,
) -> Result<(StatusCode, Json<ProfileDetail>), AppError> {
    if store::active_profile_for_actor(&state.db, actor.actor_id)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "Profile already exists for this user".to_string(),
        ));
    }

    let mut errors = FieldErrors::new();
    let name = match &payload.name {
        Some(n) if !n.trim().is_empty() => n.clone(),
        _ => {
            errors.push("name", "This field is required.");
            String::new()
        }
    };
    let area = parse_area(payload.area.as_deref(), &mut errors).unwrap_or(Area::Other);
    let availability_type = parse_availability(payload.availability_type.as_deref(), &mut errors)
        .unwrap_or(AvailabilityType::Remote);
    errors.into_result()?;

    let new = NewProfile {
        actor_id: actor.actor_id,
        name,
        bio: payload.bio,
        linkedin_url: payload.linkedin_url,
        job_title: payload.job_title,
        area,
        country: payload.country,
        availability_type,
    };
    let profile = store::insert(&state.db, &new).await.map_err(|e| {
        // The partial unique index closes the create/create race.
        if crate::errors::constraint_name(&e) == Some("profiles_one_active_per_actor") {
            AppError::Conflict("Profile already exists for this user".to_string())
        } else {
            AppError::Database(e)
        }
    })?;
    tracing::info!(profile_id = %profile.id, "created profile");

    let row = store::active_profile_with_actor(&state.db, actor.actor_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("profile vanished right after insert"))?;
    Ok((
        StatusCode::CREATED,
        Json(ProfileDetail::from_row(row, Vec::new())),
    ))
}

/// PUT/PATCH /api/v1/profile/:id
///
/// Partial-field update on the caller's own active profile.
pub async fn update_profile(
    State(state): State<AppState>,
    actor: AuthActor,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProfilePayload>,
) -> Result<Json<ProfileDetail>, AppError> {
    store::active_profile_by_id(&state.db, actor.actor_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

    let mut errors = FieldErrors::new();
    if let Some(name) = &payload.name {
        if name.trim().is_empty() {
            errors.push("name", "This field may not be blank.");
        }
    }
    let area = parse_area(payload.area.as_deref(), &mut errors);
    let availability_type = parse_availability(payload.availability_type.as_deref(), &mut errors);
    errors.into_result()?;

    let patch = ProfilePatch {
        name: payload.name,
        bio: payload.bio,
        linkedin_url: payload.linkedin_url,
        job_title: payload.job_title,
        area,
        country: payload.country,
        availability_type,
    };
    store::update_partial(&state.db, id, &patch)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

    let row = store::active_profile_with_actor(&state.db, actor.actor_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;
    let preferences = store::preferences_for_profile(&state.db, row.id).await?;
    Ok(Json(ProfileDetail::from_row(row, preferences)))
}

/// DELETE /api/v1/profile/:id
///
/// Soft delete: marks the profile deleted and anonymizes the linked actor's
/// username/email, atomically. Deleting an already-deleted profile is a 404.
pub async fn delete_profile(
    State(state): State<AppState>,
    actor: AuthActor,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let deleted = store::soft_delete_and_anonymize(&state.db, actor.actor_id, id).await?;
    if !deleted {
        return Err(AppError::NotFound("Profile not found".to_string()));
    }
    tracing::info!(profile_id = %id, "soft-deleted profile and anonymized actor");
    Ok(Json(json!({ "message": "Profile deleted successfully" })))
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// POST /api/v1/profile/change-password
///
/// Requires the current password; a wrong one changes nothing.
pub async fn change_password(
    State(state): State<AppState>,
    actor: AuthActor,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<Value>, AppError> {
    let row: ActorRow = sqlx::query_as("SELECT * FROM actors WHERE id = $1")
        .bind(actor.actor_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let mut errors = FieldErrors::new();
    let old_ok = verify_password(&req.old_password, &row.password_hash)
        .map_err(|e| anyhow::anyhow!("stored password hash is malformed: {e}"))?;
    if !old_ok {
        errors.push("old_password", "Wrong password.");
    }
    if req.new_password.len() < MIN_PASSWORD_LEN {
        errors.push(
            "new_password",
            format!("Password must be at least {MIN_PASSWORD_LEN} characters long."),
        );
    }
    errors.into_result()?;

    let new_hash = hash_password(&req.new_password)
        .map_err(|e| anyhow::anyhow!("password hashing failed: {e}"))?;
    sqlx::query("UPDATE actors SET password_hash = $2 WHERE id = $1")
        .bind(actor.actor_id)
        .bind(&new_hash)
        .execute(&state.db)
        .await?;

    Ok(Json(json!({ "message": "Password changed successfully" })))
}

fn parse_area(value: Option<&str>, errors: &mut FieldErrors) -> Option<Area> {
    let raw = value?;
    match Area::parse(raw) {
        Some(v) => Some(v),
        None => {
            errors.push("area", format!("\"{raw}\" is not a valid choice."));
            None
        }
    }
}

fn parse_availability(
    value: Option<&str>,
    errors: &mut FieldErrors,
) -> Option<AvailabilityType> {
    let raw = value?;
    match AvailabilityType::parse(raw) {
        Some(v) => Some(v),
        None => {
            errors.push(
                "availability_type",
                format!("\"{raw}\" is not a valid choice."),
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use sqlx::PgPool;

    #[test]
    fn test_parse_area_collects_error_for_unknown_value() {
        let mut errors = FieldErrors::new();
        assert_eq!(parse_area(Some("EU"), &mut errors), Some(Area::Eu));
        assert!(errors.is_empty());

        assert_eq!(parse_area(Some("ATLANTIS"), &mut errors), None);
        assert!(errors.contains("area"));
    }

    #[test]
    fn test_parse_availability_absent_is_none_without_error() {
        let mut errors = FieldErrors::new();
        assert_eq!(parse_availability(None, &mut errors), None);
        assert!(errors.is_empty());
    }

    fn test_state(pool: PgPool) -> AppState {
        AppState {
            db: pool,
            config: Config {
                database_url: String::new(),
                jwt_secret: "test-secret-that-is-long-enough".to_string(),
                jwt_expiry_mins: 60,
                port: 0,
                rust_log: "info".to_string(),
            },
        }
    }

    const TEST_PASSWORD: &str = "original-password";

    async fn register_actor(pool: &PgPool) -> AuthActor {
        let suffix = Uuid::new_v4().simple().to_string();
        let actor_id: Uuid = sqlx::query_scalar(
            "INSERT INTO actors (username, email, password_hash) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(format!("user_{suffix}"))
        .bind(format!("user_{suffix}@example.com"))
        .bind(hash_password(TEST_PASSWORD).unwrap())
        .fetch_one(pool)
        .await
        .unwrap();
        AuthActor {
            actor_id,
            is_superuser: false,
        }
    }

    fn payload(name: &str) -> ProfilePayload {
        ProfilePayload {
            name: Some(name.to_string()),
            area: Some("EU".to_string()),
            availability_type: Some("REMOTE".to_string()),
            ..Default::default()
        }
    }

    #[sqlx::test]
    async fn test_second_profile_create_conflicts(pool: PgPool) {
        let state = test_state(pool.clone());
        let actor = register_actor(&pool).await;

        create_profile(State(state.clone()), actor.clone(), Json(payload("Ada")))
            .await
            .unwrap();
        let result = create_profile(State(state), actor, Json(payload("Ada again"))).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM profiles")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[sqlx::test]
    async fn test_soft_delete_anonymizes_once(pool: PgPool) {
        let state = test_state(pool.clone());
        let actor = register_actor(&pool).await;
        let (_, Json(detail)) =
            create_profile(State(state.clone()), actor.clone(), Json(payload("Ada")))
                .await
                .unwrap();

        delete_profile(State(state.clone()), actor.clone(), Path(detail.uid))
            .await
            .unwrap();

        let deleted_on: Option<chrono::DateTime<chrono::Utc>> =
            sqlx::query_scalar("SELECT deleted_on FROM profiles WHERE id = $1")
                .bind(detail.uid)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert!(deleted_on.is_some());

        let email: String = sqlx::query_scalar("SELECT email FROM actors WHERE id = $1")
            .bind(actor.actor_id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert!(email.starts_with("deleted_"));

        // A second delete is not found and must not re-randomize the identity.
        let second = delete_profile(State(state), actor.clone(), Path(detail.uid)).await;
        assert!(matches!(second, Err(AppError::NotFound(_))));

        let email_after: String = sqlx::query_scalar("SELECT email FROM actors WHERE id = $1")
            .bind(actor.actor_id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(email, email_after);
    }

    #[sqlx::test]
    async fn test_change_password_with_wrong_old_password_keeps_hash(pool: PgPool) {
        let state = test_state(pool.clone());
        let actor = register_actor(&pool).await;

        let before: String = sqlx::query_scalar("SELECT password_hash FROM actors WHERE id = $1")
            .bind(actor.actor_id)
            .fetch_one(&pool)
            .await
            .unwrap();

        let result = change_password(
            State(state),
            actor.clone(),
            Json(ChangePasswordRequest {
                old_password: "not-the-password".to_string(),
                new_password: "brand-new-password".to_string(),
            }),
        )
        .await;
        match result {
            Err(AppError::Validation(errors)) => assert!(errors.contains("old_password")),
            other => panic!("expected validation error, got {other:?}"),
        }

        let after: String = sqlx::query_scalar("SELECT password_hash FROM actors WHERE id = $1")
            .bind(actor.actor_id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(before, after);
    }
}
