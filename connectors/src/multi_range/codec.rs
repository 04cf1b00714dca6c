//! Flat string form of a range refinement: `"<start>:<end>"`.

use serde::{Deserialize, Serialize};


/// Bounds of a range bucket. A missing bound is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Interval {
    pub start: Option<i64>,
    pub end: Option<i64>,
}

impl Interval {
    pub fn new(start: Option<i64>, end: Option<i64>) -> Self {
        Self { start, end }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// `""` when both bounds are open, otherwise `start:end` with open bounds left blank.
pub fn encode(interval: &Interval) -> String {
    if interval.is_unbounded() {
        return String::new();
    }
    let start = interval.start.map(|v| v.to_string()).unwrap_or_default();
    let end = interval.end.map(|v| v.to_string()).unwrap_or_default();
    format!("{start}:{end}")
}

/// Never fails: a missing or unparsable half decodes to an open bound.
pub fn decode(value: &str) -> Interval {
    if value.is_empty() {
        return Interval::default();
    }
    let mut halves = value.split(':');
    let start = halves.next().and_then(parse_bound);
    let end = halves.next().and_then(parse_bound);
    Interval { start, end }
}

fn parse_bound(half: &str) -> Option<i64> {
    if half.is_empty() {
        return None;
    }
    half.trim().parse().ok()
}
