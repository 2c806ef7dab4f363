//! Job posting and assessment models, plus the closed choice enums that back
//! the filterable fields. Unrecognized choice values are rejected at the
//! boundary rather than stored as free text.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Employment type of a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "employment_type", rename_all = "snake_case")]
pub enum EmploymentType {
    FullTime,
    PartTime,
    Contract,
    Internship,
}

impl EmploymentType {
    pub const ALL: [EmploymentType; 4] = [
        EmploymentType::FullTime,
        EmploymentType::PartTime,
        EmploymentType::Contract,
        EmploymentType::Internship,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmploymentType::FullTime => "full_time",
            EmploymentType::PartTime => "part_time",
            EmploymentType::Contract => "contract",
            EmploymentType::Internship => "internship",
        }
    }

    /// Human-readable label, mirrored in statistics payloads.
    pub fn label(&self) -> &'static str {
        match self {
            EmploymentType::FullTime => "Full Time",
            EmploymentType::PartTime => "Part Time",
            EmploymentType::Contract => "Contract",
            EmploymentType::Internship => "Internship",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.as_str() == value)
    }
}

/// Where the work happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "work_location", rename_all = "snake_case")]
pub enum WorkLocation {
    Remote,
    Onsite,
    Hybrid,
}

impl WorkLocation {
    pub const ALL: [WorkLocation; 3] = [
        WorkLocation::Remote,
        WorkLocation::Onsite,
        WorkLocation::Hybrid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkLocation::Remote => "remote",
            WorkLocation::Onsite => "onsite",
            WorkLocation::Hybrid => "hybrid",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WorkLocation::Remote => "Remote",
            WorkLocation::Onsite => "Onsite",
            WorkLocation::Hybrid => "Hybrid",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.as_str() == value)
    }
}

/// Origin site a posting was ingested from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "source_platform")]
pub enum SourcePlatform {
    #[serde(rename = "weworkremotely.com")]
    #[sqlx(rename = "weworkremotely.com")]
    WeWorkRemotely,
    #[serde(rename = "indeed.com")]
    #[sqlx(rename = "indeed.com")]
    Indeed,
}

impl SourcePlatform {
    pub const ALL: [SourcePlatform; 2] = [SourcePlatform::WeWorkRemotely, SourcePlatform::Indeed];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourcePlatform::WeWorkRemotely => "weworkremotely.com",
            SourcePlatform::Indeed => "indeed.com",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.as_str() == value)
    }
}

/// A job posting as stored.
#[derive(Debug, Clone, FromRow)]
pub struct JobRow {
    pub id: Uuid,
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
    pub posted_on: DateTime<Utc>,
    pub requirements: Vec<String>,
    pub company_name: Option<String>,
    pub source_platform: SourcePlatform,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
}

/// A stored skill-gap assessment tying a profile to a job.
#[derive(Debug, Clone, FromRow)]
pub struct JobAssessmentRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub profile_id: Uuid,
    pub summary: String,
    pub hard_skill_gap: Vec<String>,
    pub soft_skill_gap: Vec<String>,
    pub score: i32,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
}

/// Full job payload returned by detail endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct JobDetail {
    pub uid: Uuid,
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
    pub posted_on: DateTime<Utc>,
    pub requirements: Vec<String>,
    pub company_name: Option<String>,
    pub source_platform: SourcePlatform,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
}

impl From<JobRow> for JobDetail {
    fn from(row: JobRow) -> Self {
        JobDetail {
            uid: row.id,
            title: row.title,
            description: row.description,
            link: row.link,
            hard_skills: row.hard_skills,
            soft_skills: row.soft_skills,
            experience_level: row.experience_level,
            location: row.location,
            employment_type: row.employment_type,
            work_location: row.work_location,
            job_title_category: row.job_title_category,
            posted_on: row.posted_on,
            requirements: row.requirements,
            company_name: row.company_name,
            source_platform: row.source_platform,
            created_on: row.created_on,
            updated_on: row.updated_on,
        }
    }
}

/// Abbreviated job payload used by the list endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct JobSummary {
    pub uid: Uuid,
    pub title: String,
    pub company_name: Option<String>,
    pub location: Option<String>,
    pub employment_type: EmploymentType,
    pub work_location: WorkLocation,
    pub job_title_category: String,
    pub posted_on: DateTime<Utc>,
    pub source_platform: SourcePlatform,
    pub created_on: DateTime<Utc>,
}

impl From<&JobRow> for JobSummary {
    fn from(row: &JobRow) -> Self {
        JobSummary {
            uid: row.id,
            title: row.title.clone(),
            company_name: row.company_name.clone(),
            location: row.location.clone(),
            employment_type: row.employment_type,
            work_location: row.work_location,
            job_title_category: row.job_title_category.clone(),
            posted_on: row.posted_on,
            source_platform: row.source_platform,
            created_on: row.created_on,
        }
    }
}
