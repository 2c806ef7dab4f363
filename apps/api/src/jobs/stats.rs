//! Statistics aggregation over a (possibly pre-filtered) job collection.
//!
//! Percentages are rounded to 2 decimal places, half away from zero, and are
//! guarded against an empty collection (0.00, never NaN). Top-category ties
//! break by first-encountered order in the collection scan: counts are
//! accumulated in encounter order and sorted with a stable sort.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::job::{EmploymentType, JobRow, WorkLocation};

/// Count and share for one enumerated choice value.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChoiceStat {
    pub label: String,
    pub count: usize,
    pub percentage: f64,
}

/// Count and share for one distinct job-title category.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryStat {
    pub category: String,
    pub count: usize,
    pub percentage: f64,
}

/// Aggregate payload for `GET /jobs/statistics`.
#[derive(Debug, Clone, Serialize)]
pub struct JobStatistics {
    pub total_jobs: usize,
    pub employment_type_distribution: BTreeMap<&'static str, ChoiceStat>,
    pub work_location_distribution: BTreeMap<&'static str, ChoiceStat>,
    pub top_categories: Vec<CategoryStat>,
}

/// Maximum number of categories returned.
const TOP_CATEGORIES: usize = 10;

pub fn compute_job_statistics(jobs: &[JobRow]) -> JobStatistics {
    let total = jobs.len();

    let mut employment = BTreeMap::new();
    for choice in EmploymentType::ALL {
        let count = jobs.iter().filter(|j| j.employment_type == choice).count();
        employment.insert(
            choice.as_str(),
            ChoiceStat {
                label: choice.label().to_string(),
                count,
                percentage: percentage(count, total),
            },
        );
    }

    let mut work_location = BTreeMap::new();
    for choice in WorkLocation::ALL {
        let count = jobs.iter().filter(|j| j.work_location == choice).count();
        work_location.insert(
            choice.as_str(),
            ChoiceStat {
                label: choice.label().to_string(),
                count,
                percentage: percentage(count, total),
            },
        );
    }

    JobStatistics {
        total_jobs: total,
        employment_type_distribution: employment,
        work_location_distribution: work_location,
        top_categories: top_categories(jobs, total),
    }
}

/// Top distinct categories by descending count. Empty category values are
/// skipped; ties keep first-encountered order (stable sort over counts that
/// were accumulated in scan order).
fn top_categories(jobs: &[JobRow], total: usize) -> Vec<CategoryStat> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for job in jobs {
        if job.job_title_category.is_empty() {
            continue;
        }
        match counts
            .iter_mut()
            .find(|(category, _)| *category == job.job_title_category)
        {
            Some((_, n)) => *n += 1,
            None => counts.push((job.job_title_category.clone(), 1)),
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(TOP_CATEGORIES);
    counts
        .into_iter()
        .map(|(category, count)| CategoryStat {
            category,
            count,
            percentage: percentage(count, total),
        })
        .collect()
}

/// Share of `count` in `total` as a percentage, rounded to 2 decimals
/// (half away from zero). 0.0 when the collection is empty.
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2(count as f64 / total as f64 * 100.0)
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Mean of all assessment scores, 0.0 when none exist, rounded to 1 decimal.
pub fn average_score(scores: &[i32]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    let sum: i64 = scores.iter().map(|&s| s as i64).sum();
    let mean = sum as f64 / scores.len() as f64;
    (mean * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::SourcePlatform;
    use chrono::Utc;
    use uuid::Uuid;

    fn job(employment: EmploymentType, location: WorkLocation, category: &str) -> JobRow {
        JobRow {
            id: Uuid::new_v4(),
            title: "t".to_string(),
            description: "d".to_string(),
            link: format!("https://example.com/{}", Uuid::new_v4()),
            hard_skills: vec![],
            soft_skills: vec![],
            experience_level: None,
            location: None,
            employment_type: employment,
            work_location: location,
            job_title_category: category.to_string(),
            posted_on: Utc::now(),
            requirements: vec![],
            company_name: None,
            source_platform: SourcePlatform::WeWorkRemotely,
            created_on: Utc::now(),
            updated_on: Utc::now(),
        }
    }

    #[test]
    fn test_empty_collection_yields_all_zero_percentages() {
        let stats = compute_job_statistics(&[]);
        assert_eq!(stats.total_jobs, 0);
        for stat in stats.employment_type_distribution.values() {
            assert_eq!(stat.count, 0);
            assert_eq!(stat.percentage, 0.0);
        }
        for stat in stats.work_location_distribution.values() {
            assert_eq!(stat.percentage, 0.0);
        }
        assert!(stats.top_categories.is_empty());
    }

    #[test]
    fn test_percentages_sum_to_100_when_all_values_enumerated() {
        let jobs = vec![
            job(EmploymentType::FullTime, WorkLocation::Remote, "a"),
            job(EmploymentType::FullTime, WorkLocation::Onsite, "a"),
            job(EmploymentType::Contract, WorkLocation::Hybrid, "b"),
            job(EmploymentType::Internship, WorkLocation::Remote, "c"),
        ];
        let stats = compute_job_statistics(&jobs);
        let sum: f64 = stats
            .employment_type_distribution
            .values()
            .map(|s| s.percentage)
            .sum();
        assert!((sum - 100.0).abs() < 0.02, "sum was {sum}");
        let sum: f64 = stats
            .work_location_distribution
            .values()
            .map(|s| s.percentage)
            .sum();
        assert!((sum - 100.0).abs() < 0.02, "sum was {sum}");
    }

    #[test]
    fn test_distribution_counts_every_enum_value() {
        let jobs = vec![job(EmploymentType::PartTime, WorkLocation::Remote, "a")];
        let stats = compute_job_statistics(&jobs);
        // Every enumerated choice appears, matched or not.
        assert_eq!(stats.employment_type_distribution.len(), 4);
        assert_eq!(stats.work_location_distribution.len(), 3);
        let part_time = &stats.employment_type_distribution["part_time"];
        assert_eq!(part_time.count, 1);
        assert_eq!(part_time.percentage, 100.0);
        assert_eq!(part_time.label, "Part Time");
        assert_eq!(stats.employment_type_distribution["contract"].count, 0);
    }

    #[test]
    fn test_top_categories_sorted_descending_and_capped_at_10() {
        let mut jobs = Vec::new();
        for i in 0..12 {
            // Category "cat0" appears 12 times, "cat1" 11 times, etc.
            for c in i..12 {
                jobs.push(job(
                    EmploymentType::FullTime,
                    WorkLocation::Remote,
                    &format!("cat{c}"),
                ));
            }
        }
        let stats = compute_job_statistics(&jobs);
        assert_eq!(stats.top_categories.len(), 10);
        for pair in stats.top_categories.windows(2) {
            assert!(pair[0].count >= pair[1].count);
        }
    }

    #[test]
    fn test_top_categories_ties_break_by_first_encounter() {
        let jobs = vec![
            job(EmploymentType::FullTime, WorkLocation::Remote, "beta"),
            job(EmploymentType::FullTime, WorkLocation::Remote, "alpha"),
            job(EmploymentType::FullTime, WorkLocation::Remote, "beta"),
            job(EmploymentType::FullTime, WorkLocation::Remote, "alpha"),
        ];
        let stats = compute_job_statistics(&jobs);
        // Equal counts: "beta" was encountered first, so it stays first.
        assert_eq!(stats.top_categories[0].category, "beta");
        assert_eq!(stats.top_categories[1].category, "alpha");
    }

    #[test]
    fn test_empty_category_values_are_skipped() {
        let jobs = vec![
            job(EmploymentType::FullTime, WorkLocation::Remote, ""),
            job(EmploymentType::FullTime, WorkLocation::Remote, "real"),
        ];
        let stats = compute_job_statistics(&jobs);
        assert_eq!(stats.top_categories.len(), 1);
        assert_eq!(stats.top_categories[0].category, "real");
    }

    #[test]
    fn test_percentage_rounds_half_away_from_zero() {
        // 1/3 -> 33.33, 2/3 -> 66.67
        assert_eq!(percentage(1, 3), 33.33);
        assert_eq!(percentage(2, 3), 66.67);
        // 1/8 = 12.5% exactly.
        assert_eq!(percentage(1, 8), 12.5);
        assert_eq!(percentage(0, 0), 0.0);
    }

    #[test]
    fn test_average_score_guards_empty() {
        assert_eq!(average_score(&[]), 0.0);
        assert_eq!(average_score(&[80, 90]), 85.0);
        assert_eq!(average_score(&[1, 2]), 1.5);
        assert_eq!(average_score(&[0, 0, 1]), 0.3);
    }
}
