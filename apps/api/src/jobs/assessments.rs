//! Job assessment endpoints: a caller's scored gap analyses against postings.
//!
//! Assessments always bind to the caller's own active profile; any profile
//! reference in the payload is ignored so one actor cannot write another
//! profile's assessment.

use axum::{
    extract::{Query, RawQuery, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::extract::AuthActor;
use crate::errors::{AppError, FieldErrors};
use crate::jobs::pagination::{paginate, PageQuery, Paginated};
use crate::jobs::store::{self, NewAssessment};
use crate::models::job::{JobAssessmentRow, JobDetail, JobRow};
use crate::profiles;
use crate::state::AppState;

const ASSESSMENTS_PATH: &str = "/api/v1/job-assessments";

#[derive(Debug, Deserialize)]
pub struct CreateAssessmentRequest {
    pub job_uid: Option<Uuid>,
    pub summary: Option<String>,
    #[serde(default)]
    pub hard_skill_gap: Vec<String>,
    #[serde(default)]
    pub soft_skill_gap: Vec<String>,
    #[serde(default)]
    pub score: i32,
}

/// Assessment payload with the full job record embedded.
#[derive(Debug, Serialize)]
pub struct AssessmentDetail {
    pub uid: Uuid,
    pub job: JobDetail,
    pub profile: Uuid,
    pub summary: String,
    pub hard_skill_gap: Vec<String>,
    pub soft_skill_gap: Vec<String>,
    pub score: i32,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
}

impl AssessmentDetail {
    fn from_rows(row: JobAssessmentRow, job: JobRow) -> Self {
        AssessmentDetail {
            uid: row.id,
            job: job.into(),
            profile: row.profile_id,
            summary: row.summary,
            hard_skill_gap: row.hard_skill_gap,
            soft_skill_gap: row.soft_skill_gap,
            score: row.score,
            created_on: row.created_on,
            updated_on: row.updated_on,
        }
    }
}

/// GET /api/v1/job-assessments
///
/// A caller without an active profile owns no assessments, so the list is
/// simply empty.
pub async fn list_assessments(
    State(state): State<AppState>,
    actor: AuthActor,
    Query(page_query): Query<PageQuery>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Paginated<AssessmentDetail>>, AppError> {
    let profile = match profiles::store::active_profile_for_actor(&state.db, actor.actor_id).await? {
        Some(profile) => profile,
        None => {
            return Ok(Json(paginate(
                Vec::new(),
                page_query,
                ASSESSMENTS_PATH,
                raw_query.as_deref(),
            )))
        }
    };

    let rows = store::assessments_for_profile(&state.db, profile.id).await?;
    let job_ids: Vec<Uuid> = rows.iter().map(|r| r.job_id).collect();
    let jobs = store::jobs_by_ids(&state.db, &job_ids).await?;

    let mut details = Vec::with_capacity(rows.len());
    for row in rows {
        // Assessments cascade with their job, so the join target must exist.
        let job = jobs
            .iter()
            .find(|j| j.id == row.job_id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("assessment {} references missing job", row.id))?;
        details.push(AssessmentDetail::from_rows(row, job));
    }

    Ok(Json(paginate(
        details,
        page_query,
        ASSESSMENTS_PATH,
        raw_query.as_deref(),
    )))
}

/// POST /api/v1/job-assessments
///
/// Requires an existing profile; never auto-creates one.
pub async fn create_assessment(
    State(state): State<AppState>,
    actor: AuthActor,
    Json(req): Json<CreateAssessmentRequest>,
) -> Result<(StatusCode, Json<AssessmentDetail>), AppError> {
    let profile = profiles::store::active_profile_for_actor(&state.db, actor.actor_id)
        .await?
        .ok_or_else(|| {
            AppError::Validation(FieldErrors::single(
                "profile",
                "Profile not found. Please create a profile first.",
            ))
        })?;

    let mut errors = FieldErrors::new();
    if req.job_uid.is_none() {
        errors.push("job_uid", "This field is required.");
    }
    let summary = match &req.summary {
        Some(s) if !s.trim().is_empty() => s.clone(),
        _ => {
            errors.push("summary", "This field is required.");
            String::new()
        }
    };
    errors.into_result()?;

    let job_uid = req.job_uid.ok_or_else(|| {
        AppError::Validation(FieldErrors::single("job_uid", "This field is required."))
    })?;
    let job = store::get(&state.db, job_uid).await?.ok_or_else(|| {
        AppError::Validation(FieldErrors::single("job_uid", "Job not found"))
    })?;

    let new = NewAssessment {
        job_id: job.id,
        profile_id: profile.id,
        summary,
        hard_skill_gap: req.hard_skill_gap,
        soft_skill_gap: req.soft_skill_gap,
        score: req.score,
    };
    let row = store::insert_assessment(&state.db, &new).await?;
    tracing::info!(assessment_id = %row.id, job_id = %job.id, "created job assessment");

    Ok((
        StatusCode::CREATED,
        Json(AssessmentDetail::from_rows(row, job)),
    ))
}
