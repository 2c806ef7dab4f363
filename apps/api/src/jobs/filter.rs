//! Job filter engine.
//!
//! Query parameters become a typed [`JobFilter`]; parsing collects every
//! field error before failing. The filter is a pure predicate folded
//! conjunctively over a job collection: every supplied filter must match,
//! an omitted filter constrains nothing, and the `search` filter expands to
//! an OR across several fields. Ordering is the caller's responsibility.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::errors::{AppError, FieldErrors};
use crate::models::job::{EmploymentType, JobRow, WorkLocation};

/// Raw filter query parameters as they arrive on the wire.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct JobFilterQuery {
    pub search: Option<String>,
    pub source_platform: Option<String>,
    pub employment_type: Option<String>,
    pub work_location: Option<String>,
    pub experience_level: Option<String>,
    pub job_title_category: Option<String>,
    pub posted_on_after: Option<String>,
    pub posted_on_before: Option<String>,
    pub created_on_after: Option<String>,
    pub created_on_before: Option<String>,
    pub location: Option<String>,
    pub company_name: Option<String>,
    pub hard_skills: Option<String>,
    pub soft_skills: Option<String>,
}

/// Validated, typed filter. All text matches are case-insensitive; the
/// needles are stored pre-lowercased.
#[derive(Debug, Default, Clone)]
pub struct JobFilter {
    search: Option<String>,
    source_platform: Option<String>,
    employment_type: Option<EmploymentType>,
    work_location: Option<WorkLocation>,
    experience_level: Option<String>,
    job_title_category: Option<String>,
    posted_on_after: Option<DateTime<Utc>>,
    posted_on_before: Option<DateTime<Utc>>,
    created_on_after: Option<DateTime<Utc>>,
    created_on_before: Option<DateTime<Utc>>,
    location: Option<String>,
    company_name: Option<String>,
    hard_skills: Option<String>,
    soft_skills: Option<String>,
}

impl JobFilter {
    /// Build a filter from raw query parameters, validating choice fields and
    /// date bounds. An invalid value is a validation error, never silently
    /// ignored; empty-string values are treated as absent.
    pub fn from_query(query: JobFilterQuery) -> Result<Self, AppError> {
        let mut errors = FieldErrors::new();

        let employment_type = match nonempty(query.employment_type) {
            Some(raw) => match EmploymentType::parse(&raw) {
                Some(v) => Some(v),
                None => {
                    errors.push("employment_type", invalid_choice(&raw));
                    None
                }
            },
            None => None,
        };

        let work_location = match nonempty(query.work_location) {
            Some(raw) => match WorkLocation::parse(&raw) {
                Some(v) => Some(v),
                None => {
                    errors.push("work_location", invalid_choice(&raw));
                    None
                }
            },
            None => None,
        };

        let posted_on_after = parse_datetime(query.posted_on_after, "posted_on_after", &mut errors);
        let posted_on_before =
            parse_datetime(query.posted_on_before, "posted_on_before", &mut errors);
        let created_on_after =
            parse_datetime(query.created_on_after, "created_on_after", &mut errors);
        let created_on_before =
            parse_datetime(query.created_on_before, "created_on_before", &mut errors);

        errors.into_result()?;

        Ok(JobFilter {
            search: nonempty(query.search).map(|s| s.to_lowercase()),
            source_platform: nonempty(query.source_platform).map(|s| s.to_lowercase()),
            employment_type,
            work_location,
            experience_level: nonempty(query.experience_level).map(|s| s.to_lowercase()),
            job_title_category: nonempty(query.job_title_category).map(|s| s.to_lowercase()),
            posted_on_after,
            posted_on_before,
            created_on_after,
            created_on_before,
            location: nonempty(query.location).map(|s| s.to_lowercase()),
            company_name: nonempty(query.company_name).map(|s| s.to_lowercase()),
            hard_skills: nonempty(query.hard_skills).map(|s| s.to_lowercase()),
            soft_skills: nonempty(query.soft_skills).map(|s| s.to_lowercase()),
        })
    }

    /// Filter used by the statistics endpoint: a single optional
    /// case-insensitive exact match on category.
    pub fn for_category(category: Option<String>) -> Self {
        JobFilter {
            job_title_category: nonempty(category).map(|s| s.to_lowercase()),
            ..JobFilter::default()
        }
    }

    /// Conjunction of all supplied filters against one job.
    pub fn matches(&self, job: &JobRow) -> bool {
        if let Some(needle) = &self.search {
            if !self.search_matches(job, needle) {
                return false;
            }
        }
        if let Some(platform) = &self.source_platform {
            if !job.source_platform.as_str().eq_ignore_ascii_case(platform) {
                return false;
            }
        }
        if let Some(et) = self.employment_type {
            if job.employment_type != et {
                return false;
            }
        }
        if let Some(wl) = self.work_location {
            if job.work_location != wl {
                return false;
            }
        }
        if let Some(needle) = &self.experience_level {
            if !opt_contains(job.experience_level.as_deref(), needle) {
                return false;
            }
        }
        if let Some(category) = &self.job_title_category {
            if job.job_title_category.to_lowercase() != *category {
                return false;
            }
        }
        if let Some(bound) = self.posted_on_after {
            if job.posted_on < bound {
                return false;
            }
        }
        if let Some(bound) = self.posted_on_before {
            if job.posted_on > bound {
                return false;
            }
        }
        if let Some(bound) = self.created_on_after {
            if job.created_on < bound {
                return false;
            }
        }
        if let Some(bound) = self.created_on_before {
            if job.created_on > bound {
                return false;
            }
        }
        if let Some(needle) = &self.location {
            if !opt_contains(job.location.as_deref(), needle) {
                return false;
            }
        }
        if let Some(needle) = &self.company_name {
            if !opt_contains(job.company_name.as_deref(), needle) {
                return false;
            }
        }
        if let Some(needle) = &self.hard_skills {
            if !contains_ci(&serialize_skills(&job.hard_skills), needle) {
                return false;
            }
        }
        if let Some(needle) = &self.soft_skills {
            if !contains_ci(&serialize_skills(&job.soft_skills), needle) {
                return false;
            }
        }
        true
    }

    /// Multi-field OR search: a hit on any one field is a match.
    fn search_matches(&self, job: &JobRow, needle: &str) -> bool {
        contains_ci(&job.title, needle)
            || contains_ci(&job.description, needle)
            || opt_contains(job.location.as_deref(), needle)
            || contains_ci(&job.job_title_category, needle)
            || opt_contains(job.company_name.as_deref(), needle)
            || contains_ci(&serialize_skills(&job.hard_skills), needle)
            || contains_ci(&serialize_skills(&job.soft_skills), needle)
    }

    /// Applies the filter over a collection, preserving input order.
    pub fn apply(&self, jobs: Vec<JobRow>) -> Vec<JobRow> {
        jobs.into_iter().filter(|j| self.matches(j)).collect()
    }
}

/// Skill lists are matched as a serialized string, so a needle may also span
/// the `", "` separator the same way the original substring match did.
fn serialize_skills(skills: &[String]) -> String {
    skills.join(", ")
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

fn opt_contains(haystack: Option<&str>, needle_lower: &str) -> bool {
    haystack.map(|h| contains_ci(h, needle_lower)).unwrap_or(false)
}

/// Empty or whitespace-only parameters count as absent.
fn nonempty(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn invalid_choice(raw: &str) -> String {
    format!("\"{raw}\" is not a valid choice.")
}

/// Accepts RFC 3339 or a plain `YYYY-MM-DD` date (midnight UTC). Both range
/// bounds are inclusive.
fn parse_datetime(
    value: Option<String>,
    field: &str,
    errors: &mut FieldErrors,
) -> Option<DateTime<Utc>> {
    let raw = nonempty(value)?;
    if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
        return Some(DateTime::from_naive_utc_and_offset(
            date.and_hms_opt(0, 0, 0).unwrap_or_default(),
            Utc,
        ));
    }
    errors.push(
        field,
        format!("\"{raw}\" is not a valid datetime (expected RFC 3339 or YYYY-MM-DD)."),
    );
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::SourcePlatform;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn make_job(title: &str) -> JobRow {
        JobRow {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: "A role".to_string(),
            link: format!("https://example.com/{}", Uuid::new_v4()),
            hard_skills: vec![],
            soft_skills: vec![],
            experience_level: None,
            location: None,
            employment_type: EmploymentType::FullTime,
            work_location: WorkLocation::Remote,
            job_title_category: "other".to_string(),
            posted_on: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
            requirements: vec![],
            company_name: None,
            source_platform: SourcePlatform::WeWorkRemotely,
            created_on: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
            updated_on: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        }
    }

    fn sample_jobs() -> Vec<JobRow> {
        let mut python = make_job("Python Backend Engineer");
        python.hard_skills = vec!["django".to_string(), "postgres".to_string()];
        python.location = Some("Berlin".to_string());
        python.company_name = Some("Acme GmbH".to_string());
        python.job_title_category = "engineering".to_string();

        let mut data = make_job("Data Analyst");
        data.hard_skills = vec!["python".to_string(), "sql".to_string()];
        data.employment_type = EmploymentType::Contract;
        data.work_location = WorkLocation::Hybrid;
        data.job_title_category = "data".to_string();
        data.source_platform = SourcePlatform::Indeed;

        let mut designer = make_job("Product Designer");
        designer.soft_skills = vec!["communication".to_string()];
        designer.experience_level = Some("Senior".to_string());
        designer.job_title_category = "design".to_string();

        vec![python, data, designer]
    }

    fn filter(query: JobFilterQuery) -> JobFilter {
        JobFilter::from_query(query).unwrap()
    }

    #[test]
    fn test_absent_filters_are_identity() {
        let jobs = sample_jobs();
        let filtered = filter(JobFilterQuery::default()).apply(jobs.clone());
        assert_eq!(filtered.len(), jobs.len());
    }

    #[test]
    fn test_empty_search_is_identity() {
        let jobs = sample_jobs();
        let f = filter(JobFilterQuery {
            search: Some("".to_string()),
            hard_skills: Some("   ".to_string()),
            soft_skills: Some(String::new()),
            ..Default::default()
        });
        assert_eq!(f.apply(jobs.clone()).len(), jobs.len());
    }

    #[test]
    fn test_search_matches_title_and_skill_list_but_not_others() {
        // "python" hits one job by title and another by hard_skills.
        let jobs = sample_jobs();
        let f = filter(JobFilterQuery {
            search: Some("python".to_string()),
            ..Default::default()
        });
        let matched = f.apply(jobs);
        assert_eq!(matched.len(), 2);
        assert!(matched.iter().any(|j| j.title == "Python Backend Engineer"));
        assert!(matched.iter().any(|j| j.title == "Data Analyst"));
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let f = filter(JobFilterQuery {
            search: Some("PYTHON".to_string()),
            ..Default::default()
        });
        assert_eq!(f.apply(sample_jobs()).len(), 2);
    }

    #[test]
    fn test_conjunction_of_two_filters_is_subset_of_each() {
        let jobs = sample_jobs();
        let et_only = filter(JobFilterQuery {
            employment_type: Some("full_time".to_string()),
            ..Default::default()
        });
        let wl_only = filter(JobFilterQuery {
            work_location: Some("remote".to_string()),
            ..Default::default()
        });
        let both = filter(JobFilterQuery {
            employment_type: Some("full_time".to_string()),
            work_location: Some("remote".to_string()),
            ..Default::default()
        });

        let et_ids: Vec<Uuid> = et_only.apply(jobs.clone()).iter().map(|j| j.id).collect();
        let wl_ids: Vec<Uuid> = wl_only.apply(jobs.clone()).iter().map(|j| j.id).collect();
        let both_jobs = both.apply(jobs);

        for job in &both_jobs {
            assert!(et_ids.contains(&job.id));
            assert!(wl_ids.contains(&job.id));
            assert_eq!(job.employment_type, EmploymentType::FullTime);
            assert_eq!(job.work_location, WorkLocation::Remote);
        }
    }

    #[test]
    fn test_invalid_employment_type_is_a_validation_error() {
        let result = JobFilter::from_query(JobFilterQuery {
            employment_type: Some("freelance".to_string()),
            ..Default::default()
        });
        match result {
            Err(AppError::Validation(errors)) => assert!(errors.contains("employment_type")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_all_invalid_fields_reported_together() {
        let result = JobFilter::from_query(JobFilterQuery {
            employment_type: Some("freelance".to_string()),
            work_location: Some("moon".to_string()),
            posted_on_after: Some("yesterday".to_string()),
            ..Default::default()
        });
        match result {
            Err(AppError::Validation(errors)) => {
                assert!(errors.contains("employment_type"));
                assert!(errors.contains("work_location"));
                assert!(errors.contains("posted_on_after"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_source_platform_exact_match_case_insensitive() {
        let f = filter(JobFilterQuery {
            source_platform: Some("Indeed.COM".to_string()),
            ..Default::default()
        });
        let matched = f.apply(sample_jobs());
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].source_platform, SourcePlatform::Indeed);
    }

    #[test]
    fn test_category_is_exact_not_substring() {
        // "engineer" must not match category "engineering".
        let f = filter(JobFilterQuery {
            job_title_category: Some("engineer".to_string()),
            ..Default::default()
        });
        assert!(f.apply(sample_jobs()).is_empty());

        let f = filter(JobFilterQuery {
            job_title_category: Some("Engineering".to_string()),
            ..Default::default()
        });
        assert_eq!(f.apply(sample_jobs()).len(), 1);
    }

    #[test]
    fn test_experience_level_substring() {
        let f = filter(JobFilterQuery {
            experience_level: Some("senior".to_string()),
            ..Default::default()
        });
        let matched = f.apply(sample_jobs());
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].title, "Product Designer");
    }

    #[test]
    fn test_hard_skills_substring_over_serialized_list() {
        let f = filter(JobFilterQuery {
            hard_skills: Some("postgres".to_string()),
            ..Default::default()
        });
        let matched = f.apply(sample_jobs());
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].title, "Python Backend Engineer");
    }

    #[test]
    fn test_date_bounds_are_inclusive() {
        let jobs = sample_jobs(); // all posted 2024-06-01T12:00:00Z
        let f = filter(JobFilterQuery {
            posted_on_after: Some("2024-06-01T12:00:00Z".to_string()),
            posted_on_before: Some("2024-06-01T12:00:00Z".to_string()),
            ..Default::default()
        });
        assert_eq!(f.apply(jobs.clone()).len(), jobs.len());

        let f = filter(JobFilterQuery {
            posted_on_after: Some("2024-06-02".to_string()),
            ..Default::default()
        });
        assert!(f.apply(jobs).is_empty());
    }

    #[test]
    fn test_plain_date_parses_as_midnight_utc() {
        let jobs = sample_jobs();
        let f = filter(JobFilterQuery {
            created_on_after: Some("2024-06-01".to_string()),
            ..Default::default()
        });
        assert_eq!(f.apply(jobs.clone()).len(), jobs.len());

        let f = filter(JobFilterQuery {
            created_on_before: Some("2024-05-31".to_string()),
            ..Default::default()
        });
        assert!(f.apply(jobs).is_empty());
    }

    #[test]
    fn test_missing_optional_field_never_matches_substring_filters() {
        // Jobs without a company_name are excluded by a company_name filter.
        let f = filter(JobFilterQuery {
            company_name: Some("acme".to_string()),
            ..Default::default()
        });
        let matched = f.apply(sample_jobs());
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].company_name.as_deref(), Some("Acme GmbH"));
    }

    #[test]
    fn test_category_filter_helper_for_statistics() {
        let f = JobFilter::for_category(Some("Data".to_string()));
        let matched = f.apply(sample_jobs());
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].job_title_category, "data");

        let f = JobFilter::for_category(None);
        assert_eq!(f.apply(sample_jobs()).len(), 3);
    }
}
