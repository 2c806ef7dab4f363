//! Page-number pagination with next/previous links.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl PageQuery {
    /// Effective 1-based page number.
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// Effective page size, clamped to `1..=MAX_PAGE_SIZE`.
    pub fn page_size(&self) -> u32 {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }
}

/// A single page of results with the total match count and relative links to
/// the neighbouring pages.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub count: usize,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// Slices one page out of the full (already filtered and ordered) result set
/// and builds neighbour links that preserve the request's query string.
pub fn paginate<T>(
    items: Vec<T>,
    query: PageQuery,
    path: &str,
    raw_query: Option<&str>,
) -> Paginated<T> {
    let count = items.len();
    let page = query.page();
    let page_size = query.page_size() as usize;

    let start = (page as usize - 1).saturating_mul(page_size);
    let results: Vec<T> = items
        .into_iter()
        .skip(start)
        .take(page_size)
        .collect();

    let has_next = start + results.len() < count;
    let has_previous = page > 1 && count > 0;

    Paginated {
        count,
        next: has_next.then(|| page_link(path, raw_query, page + 1)),
        previous: has_previous.then(|| page_link(path, raw_query, page - 1)),
        results,
    }
}

/// Rebuilds the query string with `page` replaced.
fn page_link(path: &str, raw_query: Option<&str>, page: u32) -> String {
    let mut params: Vec<String> = raw_query
        .unwrap_or("")
        .split('&')
        .filter(|p| !p.is_empty() && !p.starts_with("page=") && *p != "page")
        .map(|p| p.to_string())
        .collect();
    params.push(format!("page={page}"));
    format!("{path}?{}", params.join("&"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: usize) -> Vec<usize> {
        (0..n).collect()
    }

    #[test]
    fn test_defaults_to_page_size_20() {
        let page = paginate(items(45), PageQuery::default(), "/api/v1/jobs", None);
        assert_eq!(page.count, 45);
        assert_eq!(page.results.len(), 20);
        assert_eq!(page.results[0], 0);
        assert_eq!(page.next.as_deref(), Some("/api/v1/jobs?page=2"));
        assert!(page.previous.is_none());
    }

    #[test]
    fn test_middle_page_has_both_links() {
        let query = PageQuery {
            page: Some(2),
            page_size: Some(10),
        };
        let page = paginate(
            items(35),
            query,
            "/api/v1/jobs",
            Some("search=rust&page=2&page_size=10"),
        );
        assert_eq!(page.results, (10..20).collect::<Vec<_>>());
        assert_eq!(
            page.next.as_deref(),
            Some("/api/v1/jobs?search=rust&page_size=10&page=3")
        );
        assert_eq!(
            page.previous.as_deref(),
            Some("/api/v1/jobs?search=rust&page_size=10&page=1")
        );
    }

    #[test]
    fn test_last_page_has_no_next() {
        let query = PageQuery {
            page: Some(3),
            page_size: Some(10),
        };
        let page = paginate(items(25), query, "/api/v1/jobs", None);
        assert_eq!(page.results.len(), 5);
        assert!(page.next.is_none());
        assert_eq!(page.previous.as_deref(), Some("/api/v1/jobs?page=2"));
    }

    #[test]
    fn test_page_size_capped_at_100() {
        let query = PageQuery {
            page: None,
            page_size: Some(500),
        };
        let page = paginate(items(150), query, "/api/v1/jobs", None);
        assert_eq!(page.results.len(), 100);
    }

    #[test]
    fn test_page_zero_treated_as_first_page() {
        let query = PageQuery {
            page: Some(0),
            page_size: Some(10),
        };
        let page = paginate(items(15), query, "/api/v1/jobs", None);
        assert_eq!(page.results, (0..10).collect::<Vec<_>>());
        assert!(page.previous.is_none());
    }

    #[test]
    fn test_out_of_range_page_is_empty() {
        let query = PageQuery {
            page: Some(9),
            page_size: Some(10),
        };
        let page = paginate(items(15), query, "/api/v1/jobs", None);
        assert!(page.results.is_empty());
        assert_eq!(page.count, 15);
        assert!(page.next.is_none());
    }

    #[test]
    fn test_out_of_range_page_still_links_previous() {
        // Any page past the first on a non-empty collection has a previous
        // link, even when the page itself is past the end.
        let query = PageQuery {
            page: Some(4),
            page_size: Some(10),
        };
        let page = paginate(items(15), query, "/api/v1/jobs", None);
        assert!(page.results.is_empty());
        assert_eq!(page.previous.as_deref(), Some("/api/v1/jobs?page=3"));
    }

    #[test]
    fn test_empty_collection() {
        let page = paginate(items(0), PageQuery::default(), "/api/v1/jobs", None);
        assert_eq!(page.count, 0);
        assert!(page.results.is_empty());
        assert!(page.next.is_none());
        assert!(page.previous.is_none());
    }
}
