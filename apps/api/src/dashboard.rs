//! Superuser dashboard: aggregate statistics across jobs, profiles, and
//! assessments. Grouped counts are computed in SQL; the scalar summaries
//! reuse the statistics helpers.

use axum::{extract::State, Json};
use serde::Serialize;
use sqlx::PgPool;

use crate::auth::extract::Superuser;
use crate::errors::AppError;
use crate::jobs::stats::average_score;
use crate::state::AppState;

/// One grouped count, ordered count-descending in the payload.
#[derive(Debug, Serialize)]
pub struct GroupCount {
    pub value: String,
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub user_count: i64,
    pub users_registered_today: i64,
    pub total_jobs: i64,
    pub jobs_posted_today: i64,
    pub employment_type_stats: Vec<GroupCount>,
    pub work_location_stats: Vec<GroupCount>,
    pub job_category_stats: Vec<GroupCount>,
    pub source_platform_stats: Vec<GroupCount>,
    pub total_assessments: i64,
    pub assessments_today: i64,
    pub avg_assessment_score: f64,
}

/// Top categories shown on the dashboard.
const DASHBOARD_CATEGORIES: i64 = 5;

/// GET /api/v1/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    _superuser: Superuser,
) -> Result<Json<DashboardStats>, AppError> {
    let db = &state.db;

    let user_count = count(db, "SELECT COUNT(*) FROM profiles").await?;
    let users_registered_today =
        count(db, "SELECT COUNT(*) FROM profiles WHERE created_on::date = CURRENT_DATE").await?;
    let total_jobs = count(db, "SELECT COUNT(*) FROM jobs").await?;
    let jobs_posted_today =
        count(db, "SELECT COUNT(*) FROM jobs WHERE created_on::date = CURRENT_DATE").await?;
    let total_assessments = count(db, "SELECT COUNT(*) FROM job_assessments").await?;
    let assessments_today = count(
        db,
        "SELECT COUNT(*) FROM job_assessments WHERE created_on::date = CURRENT_DATE",
    )
    .await?;

    let employment_type_stats = grouped(
        db,
        "SELECT employment_type::text, COUNT(*) FROM jobs
         GROUP BY employment_type ORDER BY COUNT(*) DESC",
    )
    .await?;
    let work_location_stats = grouped(
        db,
        "SELECT work_location::text, COUNT(*) FROM jobs
         GROUP BY work_location ORDER BY COUNT(*) DESC",
    )
    .await?;
    let job_category_stats = grouped_limited(
        db,
        "SELECT job_title_category, COUNT(*) FROM jobs
         GROUP BY job_title_category ORDER BY COUNT(*) DESC LIMIT $1",
        DASHBOARD_CATEGORIES,
    )
    .await?;
    let source_platform_stats = grouped(
        db,
        "SELECT source_platform::text, COUNT(*) FROM jobs
         GROUP BY source_platform ORDER BY COUNT(*) DESC",
    )
    .await?;

    let scores: Vec<i32> = sqlx::query_scalar("SELECT score FROM job_assessments")
        .fetch_all(db)
        .await?;

    Ok(Json(DashboardStats {
        user_count,
        users_registered_today,
        total_jobs,
        jobs_posted_today,
        employment_type_stats,
        work_location_stats,
        job_category_stats,
        source_platform_stats,
        total_assessments,
        assessments_today,
        avg_assessment_score: average_score(&scores),
    }))
}

async fn count(pool: &PgPool, sql: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(sql).fetch_one(pool).await
}

async fn grouped(pool: &PgPool, sql: &str) -> Result<Vec<GroupCount>, sqlx::Error> {
    let rows: Vec<(String, i64)> = sqlx::query_as(sql).fetch_all(pool).await?;
    Ok(rows
        .into_iter()
        .map(|(value, count)| GroupCount { value, count })
        .collect())
}

async fn grouped_limited(
    pool: &PgPool,
    sql: &str,
    limit: i64,
) -> Result<Vec<GroupCount>, sqlx::Error> {
    let rows: Vec<(String, i64)> = sqlx::query_as(sql).bind(limit).fetch_all(pool).await?;
    Ok(rows
        .into_iter()
        .map(|(value, count)| GroupCount { value, count })
        .collect())
}
