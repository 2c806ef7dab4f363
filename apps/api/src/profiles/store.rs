//! SQL access for profiles and their preferences.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::profile::{
    Area, AvailabilityType, ProfilePreferenceRow, ProfileRow, ProfileWithActorRow,
};

const PROFILE_WITH_ACTOR: &str = r#"
    SELECT p.id, p.actor_id, p.name, p.bio, p.linkedin_url, p.job_title,
           p.area, p.country, p.availability_type, p.deleted_on,
           p.created_on, p.updated_on, a.username, a.email
    FROM profiles p
    JOIN actors a ON a.id = p.actor_id
"#;

/// The actor's active (non-deleted) profile, if any.
pub async fn active_profile_for_actor(
    pool: &PgPool,
    actor_id: Uuid,
) -> Result<Option<ProfileRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM profiles WHERE actor_id = $1 AND deleted_on IS NULL")
        .bind(actor_id)
        .fetch_optional(pool)
        .await
}

/// The actor's active profile joined with its identity fields.
pub async fn active_profile_with_actor(
    pool: &PgPool,
    actor_id: Uuid,
) -> Result<Option<ProfileWithActorRow>, sqlx::Error> {
    let query = format!("{PROFILE_WITH_ACTOR} WHERE p.actor_id = $1 AND p.deleted_on IS NULL");
    sqlx::query_as(&query).bind(actor_id).fetch_optional(pool).await
}

/// One active profile by id, scoped to the owning actor.
pub async fn active_profile_by_id(
    pool: &PgPool,
    actor_id: Uuid,
    profile_id: Uuid,
) -> Result<Option<ProfileRow>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM profiles WHERE id = $1 AND actor_id = $2 AND deleted_on IS NULL",
    )
    .bind(profile_id)
    .bind(actor_id)
    .fetch_optional(pool)
    .await
}

pub struct NewProfile {
    pub actor_id: Uuid,
    pub name: String,
    pub bio: Option<String>,
    pub linkedin_url: Option<String>,
    pub job_title: Option<String>,
    pub area: Area,
    pub country: Option<String>,
    pub availability_type: AvailabilityType,
}

pub async fn insert(pool: &PgPool, new: &NewProfile) -> Result<ProfileRow, sqlx::Error> {
    sqlx::query_as(
        r#"
        INSERT INTO profiles
            (actor_id, name, bio, linkedin_url, job_title, area, country, availability_type)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(new.actor_id)
    .bind(&new.name)
    .bind(&new.bio)
    .bind(&new.linkedin_url)
    .bind(&new.job_title)
    .bind(new.area)
    .bind(&new.country)
    .bind(new.availability_type)
    .fetch_one(pool)
    .await
}

/// Partial-field update; absent fields keep their value. A JSON `null` is
/// indistinguishable from an absent field here, so a nullable column cannot
/// be cleared through PATCH, only overwritten.
#[derive(Debug, Default)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub linkedin_url: Option<String>,
    pub job_title: Option<String>,
    pub area: Option<Area>,
    pub country: Option<String>,
    pub availability_type: Option<AvailabilityType>,
}

pub async fn update_partial(
    pool: &PgPool,
    profile_id: Uuid,
    patch: &ProfilePatch,
) -> Result<Option<ProfileRow>, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE profiles SET
            name = COALESCE($2, name),
            bio = COALESCE($3, bio),
            linkedin_url = COALESCE($4, linkedin_url),
            job_title = COALESCE($5, job_title),
            area = COALESCE($6, area),
            country = COALESCE($7, country),
            availability_type = COALESCE($8, availability_type),
            updated_on = now()
        WHERE id = $1 AND deleted_on IS NULL
        RETURNING *
        "#,
    )
    .bind(profile_id)
    .bind(&patch.name)
    .bind(&patch.bio)
    .bind(&patch.linkedin_url)
    .bind(&patch.job_title)
    .bind(patch.area)
    .bind(&patch.country)
    .bind(patch.availability_type)
    .fetch_optional(pool)
    .await
}

/// Soft-deletes a profile and anonymizes its actor in one transaction, so a
/// failure can never leave a half-anonymized state. The `deleted_on IS NULL`
/// guard makes a second call a no-op (reported as not found), which keeps an
/// already-anonymized identity from being re-randomized.
pub async fn soft_delete_and_anonymize(
    pool: &PgPool,
    actor_id: Uuid,
    profile_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let deleted = sqlx::query(
        r#"
        UPDATE profiles SET deleted_on = now(), updated_on = now()
        WHERE id = $1 AND actor_id = $2 AND deleted_on IS NULL
        "#,
    )
    .bind(profile_id)
    .bind(actor_id)
    .execute(&mut *tx)
    .await?;

    if deleted.rows_affected() == 0 {
        tx.rollback().await?;
        return Ok(false);
    }

    let placeholder = Uuid::new_v4();
    sqlx::query("UPDATE actors SET username = $2, email = $3 WHERE id = $1")
        .bind(actor_id)
        .bind(format!("deleted_{placeholder}"))
        .bind(format!("deleted_{placeholder}@example.com"))
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(true)
}

pub async fn preferences_for_profile(
    pool: &PgPool,
    profile_id: Uuid,
) -> Result<Vec<ProfilePreferenceRow>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM profile_preferences WHERE profile_id = $1 ORDER BY created_on ASC",
    )
    .bind(profile_id)
    .fetch_all(pool)
    .await
}
