//! Job CRUD, filtered listing, and statistics endpoints.

use axum::{
    extract::{Path, Query, RawQuery, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::{constraint_name, AppError, FieldErrors};
use crate::jobs::filter::{JobFilter, JobFilterQuery};
use crate::jobs::pagination::{paginate, PageQuery, Paginated};
use crate::jobs::stats::{compute_job_statistics, JobStatistics};
use crate::jobs::store::{self, JobFields, JobPatch};
use crate::models::job::{
    EmploymentType, JobDetail, JobSummary, SourcePlatform, WorkLocation,
};
use crate::state::AppState;

const JOBS_PATH: &str = "/api/v1/jobs";

/// Bound carried over from the ingestion schema: skill and requirement lists
/// are capped.
const MAX_LIST_ITEMS: usize = 20;

/// Inbound job payload. Choice fields arrive as raw strings so every invalid
/// field can be reported together instead of failing on the first.
#[derive(Debug, Default, Deserialize)]
pub struct JobPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub hard_skills: Option<Vec<String>>,
    pub soft_skills: Option<Vec<String>>,
    pub experience_level: Option<String>,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub work_location: Option<String>,
    pub job_title_category: Option<String>,
    pub posted_on: Option<String>,
    pub requirements: Option<Vec<String>>,
    pub company_name: Option<String>,
    pub source_platform: Option<String>,
}

/// GET /api/v1/jobs
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(filter_query): Query<JobFilterQuery>,
    Query(page_query): Query<PageQuery>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Paginated<JobSummary>>, AppError> {
    let filter = JobFilter::from_query(filter_query)?;
    let jobs = store::list_all(&state.db).await?;
    let matched = filter.apply(jobs);
    let summaries: Vec<JobSummary> = matched.iter().map(JobSummary::from).collect();
    Ok(Json(paginate(
        summaries,
        page_query,
        JOBS_PATH,
        raw_query.as_deref(),
    )))
}

/// GET /api/v1/jobs/:id
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobDetail>, AppError> {
    let job = store::get(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;
    Ok(Json(job.into()))
}

/// POST /api/v1/jobs
pub async fn create_job(
    State(state): State<AppState>,
    Json(payload): Json<JobPayload>,
) -> Result<(StatusCode, Json<JobDetail>), AppError> {
    let fields = validate_full(payload)?;
    let job = store::insert(&state.db, &fields)
        .await
        .map_err(map_link_conflict)?;
    tracing::info!(job_id = %job.id, "created job posting");
    Ok((StatusCode::CREATED, Json(job.into())))
}

/// PUT /api/v1/jobs/:id
pub async fn replace_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<JobPayload>,
) -> Result<Json<JobDetail>, AppError> {
    let fields = validate_full(payload)?;
    let job = store::replace(&state.db, id, &fields)
        .await
        .map_err(map_link_conflict)?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;
    Ok(Json(job.into()))
}

/// PATCH /api/v1/jobs/:id
pub async fn patch_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<JobPayload>,
) -> Result<Json<JobDetail>, AppError> {
    let patch = validate_patch(payload)?;
    let job = store::update_partial(&state.db, id, &patch)
        .await
        .map_err(map_link_conflict)?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;
    Ok(Json(job.into()))
}

/// DELETE /api/v1/jobs/:id
pub async fn delete_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !store::delete(&state.db, id).await? {
        return Err(AppError::NotFound(format!("Job {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct StatisticsQuery {
    pub category: Option<String>,
}

/// GET /api/v1/jobs/statistics
///
/// Aggregates over all jobs, optionally pre-filtered to one category.
pub async fn job_statistics(
    State(state): State<AppState>,
    Query(query): Query<StatisticsQuery>,
) -> Result<Json<JobStatistics>, AppError> {
    let jobs = store::list_all(&state.db).await?;
    let matched = JobFilter::for_category(query.category).apply(jobs);
    Ok(Json(compute_job_statistics(&matched)))
}

/// Validates a full create/replace payload, collecting every field error.
fn validate_full(payload: JobPayload) -> Result<JobFields, AppError> {
    let mut errors = FieldErrors::new();

    let title = required_text(payload.title, "title", &mut errors);
    let description = required_text(payload.description, "description", &mut errors);
    let link = required_text(payload.link, "link", &mut errors);

    let employment_type = parse_choice(
        payload.employment_type,
        "employment_type",
        EmploymentType::parse,
        &mut errors,
    )
    .unwrap_or(EmploymentType::FullTime);
    let work_location = parse_choice(
        payload.work_location,
        "work_location",
        WorkLocation::parse,
        &mut errors,
    )
    .unwrap_or(WorkLocation::Remote);
    let source_platform = parse_choice(
        payload.source_platform,
        "source_platform",
        SourcePlatform::parse,
        &mut errors,
    )
    .unwrap_or(SourcePlatform::WeWorkRemotely);

    let posted_on = parse_payload_datetime(payload.posted_on, "posted_on", &mut errors);
    let hard_skills = bounded_list(payload.hard_skills, "hard_skills", &mut errors);
    let soft_skills = bounded_list(payload.soft_skills, "soft_skills", &mut errors);
    let requirements = bounded_list(payload.requirements, "requirements", &mut errors);

    errors.into_result()?;

    Ok(JobFields {
        // Collected errors guarantee these are present past this point.
        title: title.unwrap_or_default(),
        description: description.unwrap_or_default(),
        link: link.unwrap_or_default(),
        hard_skills,
        soft_skills,
        experience_level: payload.experience_level,
        location: payload.location,
        employment_type,
        work_location,
        job_title_category: payload
            .job_title_category
            .unwrap_or_else(|| "other".to_string()),
        posted_on,
        requirements,
        company_name: payload.company_name,
        source_platform,
    })
}

/// Validates a partial payload: only supplied fields are checked.
fn validate_patch(payload: JobPayload) -> Result<JobPatch, AppError> {
    let mut errors = FieldErrors::new();

    for (value, field) in [
        (&payload.title, "title"),
        (&payload.description, "description"),
        (&payload.link, "link"),
    ] {
        if let Some(v) = value {
            if v.trim().is_empty() {
                errors.push(field, "This field may not be blank.");
            }
        }
    }

    let employment_type = parse_choice(
        payload.employment_type,
        "employment_type",
        EmploymentType::parse,
        &mut errors,
    );
    let work_location = parse_choice(
        payload.work_location,
        "work_location",
        WorkLocation::parse,
        &mut errors,
    );
    let source_platform = parse_choice(
        payload.source_platform,
        "source_platform",
        SourcePlatform::parse,
        &mut errors,
    );
    let posted_on = parse_payload_datetime(payload.posted_on, "posted_on", &mut errors);

    let hard_skills = payload
        .hard_skills
        .map(|v| check_bound(v, "hard_skills", &mut errors));
    let soft_skills = payload
        .soft_skills
        .map(|v| check_bound(v, "soft_skills", &mut errors));
    let requirements = payload
        .requirements
        .map(|v| check_bound(v, "requirements", &mut errors));

    errors.into_result()?;

    Ok(JobPatch {
        title: payload.title,
        description: payload.description,
        link: payload.link,
        hard_skills,
        soft_skills,
        experience_level: payload.experience_level,
        location: payload.location,
        employment_type,
        work_location,
        job_title_category: payload.job_title_category,
        posted_on,
        requirements,
        company_name: payload.company_name,
        source_platform,
    })
}

fn required_text(
    value: Option<String>,
    field: &str,
    errors: &mut FieldErrors,
) -> Option<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Some(v),
        Some(_) => {
            errors.push(field, "This field may not be blank.");
            None
        }
        None => {
            errors.push(field, "This field is required.");
            None
        }
    }
}

fn parse_choice<T>(
    value: Option<String>,
    field: &str,
    parse: fn(&str) -> Option<T>,
    errors: &mut FieldErrors,
) -> Option<T> {
    let raw = value?;
    match parse(&raw) {
        Some(v) => Some(v),
        None => {
            errors.push(field, format!("\"{raw}\" is not a valid choice."));
            None
        }
    }
}

fn parse_payload_datetime(
    value: Option<String>,
    field: &str,
    errors: &mut FieldErrors,
) -> Option<DateTime<Utc>> {
    let raw = value?;
    match DateTime::parse_from_rfc3339(&raw) {
        Ok(dt) => Some(dt.with_timezone(&Utc)),
        Err(_) => {
            errors.push(field, format!("\"{raw}\" is not a valid RFC 3339 datetime."));
            None
        }
    }
}

fn bounded_list(
    value: Option<Vec<String>>,
    field: &str,
    errors: &mut FieldErrors,
) -> Vec<String> {
    check_bound(value.unwrap_or_default(), field, errors)
}

fn check_bound(value: Vec<String>, field: &str, errors: &mut FieldErrors) -> Vec<String> {
    if value.len() > MAX_LIST_ITEMS {
        errors.push(
            field,
            format!("Ensure this list has no more than {MAX_LIST_ITEMS} items."),
        );
    }
    value
}

fn map_link_conflict(err: sqlx::Error) -> AppError {
    if constraint_name(&err) == Some("jobs_link_key") {
        AppError::Validation(FieldErrors::single(
            "link",
            "A job with this link already exists.",
        ))
    } else {
        AppError::Database(err)
    }
}
