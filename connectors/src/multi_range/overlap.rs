//! Whether a range bucket can still narrow the current results.

use common::search_results::FacetStats;

use super::codec::Interval;


/// A bucket is refinable when the facet has statistics and either range
/// reaches strictly inside the other. Touching edges do not count.
pub fn has_refinement(stats: Option<FacetStats>, interval: &Interval) -> bool {
    let Some(stats) = stats else {
        return false;
    };
    let start = interval.start.map(|v| v as f64).unwrap_or(f64::NEG_INFINITY);
    let end = interval.end.map(|v| v as f64).unwrap_or(f64::INFINITY);
    stats_inside_bucket(&stats, start, end) || bucket_inside_stats(&stats, start, end)
}

fn stats_inside_bucket(stats: &FacetStats, start: f64, end: f64) -> bool {
    (stats.min > start && stats.min < end) || (stats.max > start && stats.max < end)
}

fn bucket_inside_stats(stats: &FacetStats, start: f64, end: f64) -> bool {
    (start > stats.min && start < stats.max) || (end > stats.min && end < stats.max)
}
