//! SQL access for jobs and assessments. Filtering happens in the filter
//! engine; this layer only fetches, orders, and mutates rows.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::job::{EmploymentType, JobAssessmentRow, JobRow, SourcePlatform, WorkLocation};

/// Validated field set for inserting or fully replacing a job.
#[derive(Debug, Clone)]
pub struct JobFields {
    pub title: String,
    pub description: String,
    pub link: String,
    pub hard_skills: Vec<String>,
    pub soft_skills: Vec<String>,
    pub experience_level: Option<String>,
    pub location: Option<String>,
    pub employment_type: EmploymentType,
    pub work_location: WorkLocation,
    pub job_title_category: String,
    pub posted_on: Option<chrono::DateTime<chrono::Utc>>,
    pub requirements: Vec<String>,
    pub company_name: Option<String>,
    pub source_platform: SourcePlatform,
}

/// Validated field set for a partial update; `None` leaves the column as is.
/// A JSON `null` deserializes to the same `None` as an absent field, so a
/// nullable column cannot be cleared through PATCH, only overwritten.
#[derive(Debug, Clone, Default)]
pub struct JobPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub hard_skills: Option<Vec<String>>,
    pub soft_skills: Option<Vec<String>>,
    pub experience_level: Option<String>,
    pub location: Option<String>,
    pub employment_type: Option<EmploymentType>,
    pub work_location: Option<WorkLocation>,
    pub job_title_category: Option<String>,
    pub posted_on: Option<chrono::DateTime<chrono::Utc>>,
    pub requirements: Option<Vec<String>>,
    pub company_name: Option<String>,
    pub source_platform: Option<SourcePlatform>,
}

/// All jobs, newest-created first (the API list ordering).
pub async fn list_all(pool: &PgPool) -> Result<Vec<JobRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM jobs ORDER BY created_on DESC")
        .fetch_all(pool)
        .await
}

pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<JobRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM jobs WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn insert(pool: &PgPool, fields: &JobFields) -> Result<JobRow, sqlx::Error> {
    sqlx::query_as(
        r#"
        INSERT INTO jobs
            (title, description, link, hard_skills, soft_skills, experience_level,
             location, employment_type, work_location, job_title_category,
             posted_on, requirements, company_name, source_platform)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, COALESCE($11, now()), $12, $13, $14)
        RETURNING *
        "#,
    )
    .bind(&fields.title)
    .bind(&fields.description)
    .bind(&fields.link)
    .bind(&fields.hard_skills)
    .bind(&fields.soft_skills)
    .bind(&fields.experience_level)
    .bind(&fields.location)
    .bind(fields.employment_type)
    .bind(fields.work_location)
    .bind(&fields.job_title_category)
    .bind(fields.posted_on)
    .bind(&fields.requirements)
    .bind(&fields.company_name)
    .bind(fields.source_platform)
    .fetch_one(pool)
    .await
}

/// Full replace (PUT semantics).
pub async fn replace(
    pool: &PgPool,
    id: Uuid,
    fields: &JobFields,
) -> Result<Option<JobRow>, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE jobs SET
            title = $2, description = $3, link = $4, hard_skills = $5,
            soft_skills = $6, experience_level = $7, location = $8,
            employment_type = $9, work_location = $10, job_title_category = $11,
            posted_on = COALESCE($12, posted_on), requirements = $13,
            company_name = $14, source_platform = $15, updated_on = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&fields.title)
    .bind(&fields.description)
    .bind(&fields.link)
    .bind(&fields.hard_skills)
    .bind(&fields.soft_skills)
    .bind(&fields.experience_level)
    .bind(&fields.location)
    .bind(fields.employment_type)
    .bind(fields.work_location)
    .bind(&fields.job_title_category)
    .bind(fields.posted_on)
    .bind(&fields.requirements)
    .bind(&fields.company_name)
    .bind(fields.source_platform)
    .fetch_optional(pool)
    .await
}

/// Partial update (PATCH semantics): absent fields keep their value.
pub async fn update_partial(
    pool: &PgPool,
    id: Uuid,
    patch: &JobPatch,
) -> Result<Option<JobRow>, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE jobs SET
            title = COALESCE($2, title),
            description = COALESCE($3, description),
            link = COALESCE($4, link),
            hard_skills = COALESCE($5, hard_skills),
            soft_skills = COALESCE($6, soft_skills),
            experience_level = COALESCE($7, experience_level),
            location = COALESCE($8, location),
            employment_type = COALESCE($9, employment_type),
            work_location = COALESCE($10, work_location),
            job_title_category = COALESCE($11, job_title_category),
            posted_on = COALESCE($12, posted_on),
            requirements = COALESCE($13, requirements),
            company_name = COALESCE($14, company_name),
            source_platform = COALESCE($15, source_platform),
            updated_on = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&patch.title)
    .bind(&patch.description)
    .bind(&patch.link)
    .bind(&patch.hard_skills)
    .bind(&patch.soft_skills)
    .bind(&patch.experience_level)
    .bind(&patch.location)
    .bind(patch.employment_type)
    .bind(patch.work_location)
    .bind(&patch.job_title_category)
    .bind(patch.posted_on)
    .bind(&patch.requirements)
    .bind(&patch.company_name)
    .bind(patch.source_platform)
    .fetch_optional(pool)
    .await
}

/// Deletes a job; assessments cascade. Returns whether a row was removed.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// A profile's assessments, newest-created first.
pub async fn assessments_for_profile(
    pool: &PgPool,
    profile_id: Uuid,
) -> Result<Vec<JobAssessmentRow>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM job_assessments WHERE profile_id = $1 ORDER BY created_on DESC",
    )
    .bind(profile_id)
    .fetch_all(pool)
    .await
}

/// Jobs referenced by a set of assessments, fetched in one round trip.
pub async fn jobs_by_ids(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<JobRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM jobs WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(pool)
        .await
}

pub struct NewAssessment {
    pub job_id: Uuid,
    pub profile_id: Uuid,
    pub summary: String,
    pub hard_skill_gap: Vec<String>,
    pub soft_skill_gap: Vec<String>,
    pub score: i32,
}

pub async fn insert_assessment(
    pool: &PgPool,
    new: &NewAssessment,
) -> Result<JobAssessmentRow, sqlx::Error> {
    sqlx::query_as(
        r#"
        INSERT INTO job_assessments
            (job_id, profile_id, summary, hard_skill_gap, soft_skill_gap, score)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(new.job_id)
    .bind(new.profile_id)
    .bind(&new.summary)
    .bind(&new.hard_skill_gap)
    .bind(&new.soft_skill_gap)
    .bind(new.score)
    .fetch_one(pool)
    .await
}
