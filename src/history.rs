//! Log history view
//!
//! Ordering, date search and pagination of a user's logs, plus the short
//! trend window shown next to the table.

use crate::summary::newest_first;
use crate::types::LogRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Logs per history page
pub const DEFAULT_PAGE_SIZE: usize = 7;

/// Logs in the trend chart
pub const TREND_WINDOW: usize = 7;

/// Sort logs newest first (date, then time of day)
pub fn order_recent(logs: &mut [LogRecord]) {
    logs.sort_by(newest_first);
}

/// Move logs recorded on the searched date to the front
///
/// The search is a `YYYY-MM-DD` string; anything unparseable leaves the order
/// untouched. Relative order is kept on both sides of the split.
pub fn prioritize_date(logs: Vec<LogRecord>, search: Option<&str>) -> Vec<LogRecord> {
    let Some(raw) = search.map(str::trim).filter(|s| !s.is_empty()) else {
        return logs;
    };

    let target = match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => date,
        Err(e) => {
            log::warn!("ignoring unparseable search date {raw:?}: {e}");
            return logs;
        }
    };

    let (mut matching, others): (Vec<_>, Vec<_>) =
        logs.into_iter().partition(|log| log.date == target);
    matching.extend(others);
    matching
}

/// The most recent logs in chronological order
pub fn trend_window(logs: &[LogRecord]) -> Vec<LogRecord> {
    let mut recent: Vec<&LogRecord> = logs.iter().collect();
    recent.sort_by(|a, b| newest_first(a, b));
    recent.truncate(TREND_WINDOW);
    recent.into_iter().rev().cloned().collect()
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// 1-based page number
    pub number: usize,
    pub num_pages: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub has_previous: bool,
    pub has_next: bool,
    pub items: Vec<T>,
}

/// Fixed-size paginator with lenient page lookup
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    per_page: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Paginator {
    /// Create a paginator; a zero page size falls back to the default
    pub fn new(per_page: usize) -> Self {
        let per_page = if per_page == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            per_page
        };
        Self { per_page }
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    /// Number of pages; an empty list still has one (empty) page
    pub fn num_pages(&self, total_items: usize) -> usize {
        total_items.div_ceil(self.per_page).max(1)
    }

    /// Resolve a raw page query
    ///
    /// A missing or non-numeric value gives the first page; a number outside
    /// the valid range gives the last page.
    pub fn resolve_page(&self, query: Option<&str>, total_items: usize) -> usize {
        let num_pages = self.num_pages(total_items);
        match query.map(str::trim).map(str::parse::<i64>) {
            Some(Ok(n)) if n >= 1 && (n as u64) <= num_pages as u64 => n as usize,
            Some(Ok(_)) => num_pages,
            _ => 1,
        }
    }

    /// Slice out the requested page
    pub fn page<T: Clone>(&self, items: &[T], query: Option<&str>) -> Page<T> {
        let total_items = items.len();
        let num_pages = self.num_pages(total_items);
        let number = self.resolve_page(query, total_items);

        let start = (number - 1) * self.per_page;
        let end = (start + self.per_page).min(total_items);
        let items = items.get(start..end).map(<[T]>::to_vec).unwrap_or_default();

        Page {
            number,
            num_pages,
            per_page: self.per_page,
            total_items,
            has_previous: number > 1,
            has_next: number < num_pages,
            items,
        }
    }
}

/// Everything the history screen renders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub logs: Page<LogRecord>,
    /// Trend window, oldest first
    pub chart: Vec<LogRecord>,
    /// The search as submitted, empty when none
    pub search_date: String,
}

/// Build the history view for a page query and optional date search
pub fn dashboard(
    logs: &[LogRecord],
    paginator: &Paginator,
    page: Option<&str>,
    search_date: Option<&str>,
) -> DashboardView {
    let mut ordered = logs.to_vec();
    order_recent(&mut ordered);
    let ordered = prioritize_date(ordered, search_date);

    DashboardView {
        logs: paginator.page(&ordered, page),
        chart: trend_window(logs),
        search_date: search_date.unwrap_or_default().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use pretty_assertions::assert_eq;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn make_log(id: i64, d: u32) -> LogRecord {
        LogRecord {
            id: Some(id),
            ..LogRecord::new(day(d))
        }
    }

    fn ids(logs: &[LogRecord]) -> Vec<i64> {
        logs.iter().filter_map(|l| l.id).collect()
    }

    #[test]
    fn test_order_recent() {
        let mut early = make_log(1, 3);
        early.time = NaiveTime::from_hms_opt(7, 0, 0);
        let mut late = make_log(2, 3);
        late.time = NaiveTime::from_hms_opt(22, 0, 0);

        let mut logs = vec![make_log(3, 1), early, late, make_log(4, 5)];
        order_recent(&mut logs);
        assert_eq!(ids(&logs), vec![4, 2, 1, 3]);
    }

    #[test]
    fn test_prioritize_date() {
        let logs = vec![make_log(1, 9), make_log(2, 8), make_log(3, 7), make_log(4, 8)];

        let reordered = prioritize_date(logs.clone(), Some("2024-05-08"));
        assert_eq!(ids(&reordered), vec![2, 4, 1, 3]);

        let unchanged = prioritize_date(logs.clone(), Some("08/05/2024"));
        assert_eq!(ids(&unchanged), vec![1, 2, 3, 4]);

        let unchanged = prioritize_date(logs, None);
        assert_eq!(ids(&unchanged), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_pagination() {
        let items: Vec<u32> = (1..=16).collect();
        let paginator = Paginator::default();

        let first = paginator.page(&items, None);
        assert_eq!(first.number, 1);
        assert_eq!(first.num_pages, 3);
        assert_eq!(first.items, vec![1, 2, 3, 4, 5, 6, 7]);
        assert!(!first.has_previous);
        assert!(first.has_next);

        let last = paginator.page(&items, Some("3"));
        assert_eq!(last.items, vec![15, 16]);
        assert!(last.has_previous);
        assert!(!last.has_next);
    }

    #[test]
    fn test_pagination_lenient_queries() {
        let items: Vec<u32> = (1..=16).collect();
        let paginator = Paginator::default();

        assert_eq!(paginator.page(&items, Some("abc")).number, 1);
        assert_eq!(paginator.page(&items, Some("")).number, 1);
        assert_eq!(paginator.page(&items, Some("99")).number, 3);
        assert_eq!(paginator.page(&items, Some("0")).number, 3);
        assert_eq!(paginator.page(&items, Some("-2")).number, 3);
    }

    #[test]
    fn test_pagination_empty() {
        let items: Vec<u32> = Vec::new();
        let page = Paginator::default().page(&items, Some("4"));
        assert_eq!(page.number, 1);
        assert_eq!(page.num_pages, 1);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_trend_window_is_chronological() {
        let logs: Vec<LogRecord> = (1..=10).map(|d| make_log(i64::from(d), d)).collect();
        let chart = trend_window(&logs);
        assert_eq!(ids(&chart), vec![4, 5, 6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_dashboard() {
        let logs: Vec<LogRecord> = (1..=10).map(|d| make_log(i64::from(d), d)).collect();

        let view = dashboard(&logs, &Paginator::default(), Some("2"), Some("2024-05-09"));
        assert_eq!(view.search_date, "2024-05-09");
        assert_eq!(view.logs.number, 2);
        // page 1: 9, 10, 8, 7, 6, 5, 4
        assert_eq!(ids(&view.logs.items), vec![3, 2, 1]);
        assert_eq!(ids(&view.chart), vec![4, 5, 6, 7, 8, 9, 10]);
    }
}
