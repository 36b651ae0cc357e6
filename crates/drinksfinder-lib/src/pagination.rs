//! Windowing of backend results with `start`/`limit`.

use serde::Serialize;

/// Pagination directives from the query string.
///
/// `start` is 1-indexed. Values that are not integers are treated as absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    pub start: Option<i64>,
    pub limit: Option<i64>,
}

impl Pagination {
    pub fn new(start: Option<i64>, limit: Option<i64>) -> Self {
        Self { start, limit }
    }

    pub fn from_params(start: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            start: start.and_then(|s| s.trim().parse().ok()),
            limit: limit.and_then(|s| s.trim().parse().ok()),
        }
    }

    /// Zero-based `[start, end)` window over `total` items.
    ///
    /// `start <= 0` collapses to the first item, a start past the end gives an
    /// empty window at the end, and `limit` can only shrink the window.
    pub fn window(&self, total: usize) -> (usize, usize) {
        let start = self
            .start
            .map(|s| usize::try_from(s.saturating_sub(1)).unwrap_or(0))
            .unwrap_or(0)
            .min(total);

        let end = match self.limit {
            Some(limit) if limit <= 0 => start,
            Some(limit) => usize::try_from(limit)
                .map(|limit| start.saturating_add(limit).min(total))
                .unwrap_or(total),
            None => total,
        };

        (start, end)
    }

    /// Slice `items` and report the window size alongside the full size.
    pub fn apply<T>(&self, mut items: Vec<T>) -> Page<T> {
        let total = items.len();
        if total == 0 {
            return Page {
                results: items,
                count: 0,
                total: 0,
            };
        }

        let (start, end) = self.window(total);
        items.truncate(end);
        items.drain(..start);

        Page {
            count: end - start,
            results: items,
            total,
        }
    }
}

/// Search response payload: the windowed results, their number, and the
/// number of results before windowing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub results: Vec<T>,
    pub count: usize,
    pub total: usize,
}
