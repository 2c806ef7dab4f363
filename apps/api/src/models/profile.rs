//! Profile, profile preference, and the region/availability choice enums.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Broad geographic region a profile belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "area")]
pub enum Area {
    #[sqlx(rename = "SE_ASIA")]
    SeAsia,
    #[sqlx(rename = "EMEA")]
    Emea,
    #[sqlx(rename = "APAC")]
    Apac,
    #[sqlx(rename = "EU")]
    Eu,
    #[sqlx(rename = "OTHER")]
    Other,
}

impl Area {
    pub const ALL: [Area; 5] = [Area::SeAsia, Area::Emea, Area::Apac, Area::Eu, Area::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Area::SeAsia => "SE_ASIA",
            Area::Emea => "EMEA",
            Area::Apac => "APAC",
            Area::Eu => "EU",
            Area::Other => "OTHER",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.as_str() == value)
    }
}

/// How a profile wants to work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "availability_type")]
pub enum AvailabilityType {
    #[sqlx(rename = "REMOTE")]
    Remote,
    #[sqlx(rename = "ONSITE")]
    Onsite,
    #[sqlx(rename = "HYBRID")]
    Hybrid,
}

impl AvailabilityType {
    pub const ALL: [AvailabilityType; 3] = [
        AvailabilityType::Remote,
        AvailabilityType::Onsite,
        AvailabilityType::Hybrid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AvailabilityType::Remote => "REMOTE",
            AvailabilityType::Onsite => "ONSITE",
            AvailabilityType::Hybrid => "HYBRID",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.as_str() == value)
    }
}

/// A user's professional profile as stored.
#[derive(Debug, Clone, FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub actor_id: Uuid,
    pub name: String,
    pub bio: Option<String>,
    pub linkedin_url: Option<String>,
    pub job_title: Option<String>,
    pub area: Area,
    pub country: Option<String>,
    pub availability_type: AvailabilityType,
    pub deleted_on: Option<DateTime<Utc>>,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
}

/// A profile joined with its actor's read-only identity fields.
#[derive(Debug, Clone, FromRow)]
pub struct ProfileWithActorRow {
    pub id: Uuid,
    pub actor_id: Uuid,
    pub name: String,
    pub bio: Option<String>,
    pub linkedin_url: Option<String>,
    pub job_title: Option<String>,
    pub area: Area,
    pub country: Option<String>,
    pub availability_type: AvailabilityType,
    pub deleted_on: Option<DateTime<Utc>>,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
    pub username: String,
    pub email: String,
}

/// A profile's stored job-search preference.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProfilePreferenceRow {
    #[serde(rename = "uid")]
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub profile_id: Uuid,
    pub job_title: Option<String>,
    pub availability_type: AvailabilityType,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
}

/// Profile payload returned by the profile endpoints. Email and username come
/// from the linked actor and are read-only through this surface.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileDetail {
    pub uid: Uuid,
    pub name: String,
    pub bio: Option<String>,
    pub linkedin_url: Option<String>,
    pub job_title: Option<String>,
    pub area: Area,
    pub country: Option<String>,
    pub availability_type: AvailabilityType,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
    pub email: String,
    pub username: String,
    pub preferences: Vec<ProfilePreferenceRow>,
}

impl ProfileDetail {
    pub fn from_row(row: ProfileWithActorRow, preferences: Vec<ProfilePreferenceRow>) -> Self {
        ProfileDetail {
            uid: row.id,
            name: row.name,
            bio: row.bio,
            linkedin_url: row.linkedin_url,
            job_title: row.job_title,
            area: row.area,
            country: row.country,
            availability_type: row.availability_type,
            created_on: row.created_on,
            updated_on: row.updated_on,
            email: row.email,
            username: row.username,
            preferences,
        }
    }
}
