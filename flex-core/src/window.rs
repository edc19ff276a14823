//! Time-Window Filtering
//!
//! Shared point-selection, sorting and re-indexing used by the activation
//! aggregation for both the metering and the schedule series. The two
//! call sites must behave identically; that is why this lives here and
//! not next to either series.
//!
//! All temporal values are string-encoded epoch seconds. An empty string
//! means "no bound" (an activation window that has not ended yet).

use crate::types::Point;

/// Parse a string-encoded epoch-second value; empty or malformed → `None`
pub fn parse_epoch(s: &str) -> Option<i64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<i64>().ok()
}

/// Whether `[start_a, end_a)` overlaps `[start_b, end_b)`.
///
/// Unparsable or empty bounds are treated as unbounded on their side, so
/// an open-ended window overlaps everything after its start.
pub fn overlaps(start_a: &str, end_a: &str, start_b: &str, end_b: &str) -> bool {
    let starts_before_b_ends = match (parse_epoch(start_a), parse_epoch(end_b)) {
        (Some(a), Some(b)) => a < b,
        _ => true,
    };
    let ends_after_b_starts = match (parse_epoch(end_a), parse_epoch(start_b)) {
        (Some(a), Some(b)) => a > b,
        _ => true,
    };
    starts_before_b_ends && ends_after_b_starts
}

/// Whether `[outer_start, outer_end]` fully covers `[inner_start, inner_end]`.
///
/// A missing outer bound cannot guarantee coverage and yields `false`;
/// a missing inner bound has nothing to cover and yields `true` for that
/// side.
pub fn covers(outer_start: &str, outer_end: &str, inner_start: &str, inner_end: &str) -> bool {
    let lower = match (parse_epoch(outer_start), parse_epoch(inner_start)) {
        (Some(o), Some(i)) => o <= i,
        (None, Some(_)) => false,
        _ => true,
    };
    let upper = match (parse_epoch(outer_end), parse_epoch(inner_end)) {
        (Some(o), Some(i)) => o >= i,
        (None, Some(_)) => false,
        _ => true,
    };
    lower && upper
}

/// Keep a point iff `start >= window_start - margin` and
/// `end <= window_end + margin`.
///
/// An empty window bound drops that side of the check; a point whose own
/// timestamps do not parse cannot satisfy a present bound and is dropped.
pub fn clip(points: Vec<Point>, window_start: &str, window_end: &str, margin_secs: i64) -> Vec<Point> {
    let lower = parse_epoch(window_start).map(|s| s - margin_secs);
    let upper = parse_epoch(window_end).map(|e| e + margin_secs);
    points
        .into_iter()
        .filter(|p| {
            let start_ok = match lower {
                Some(lo) => p.start_epoch().map_or(false, |s| s >= lo),
                None => true,
            };
            let end_ok = match upper {
                Some(hi) => p.end_epoch().map_or(false, |e| e <= hi),
                None => true,
            };
            start_ok && end_ok
        })
        .collect()
}

/// Sort points ascending by the numeric value of `timeStampStart`.
/// Unparsable starts sort last; the sort is stable.
pub fn sort_points(points: &mut [Point]) {
    points.sort_by_key(|p| p.start_epoch().unwrap_or(i64::MAX));
}

/// Sort, then assign sequential 1-based string ids. The original point
/// ids are discarded; downstream consumers rely on the positional ids
/// for comparison against separately-indexed series.
pub fn reindex(mut points: Vec<Point>) -> Vec<Point> {
    sort_points(&mut points);
    for (i, point) in points.iter_mut().enumerate() {
        point.point_id = (i + 1).to_string();
    }
    points
}
