//! Time-interval utilities: overlap and containment tests for closed
//! (start, end) ranges in epoch seconds, plus edge classification against a
//! reference interval.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A closed time interval in epoch seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: f64,
    pub end: f64,
}

impl TimeRange {
    /// Create a range, swapping the endpoints if they arrive reversed.
    pub fn new(start: f64, end: f64) -> Self {
        if end < start {
            TimeRange { start: end, end: start }
        } else {
            TimeRange { start, end }
        }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Whether an instant falls inside the range (endpoints inclusive).
    pub fn contains(&self, t: f64) -> bool {
        self.start <= t && t <= self.end
    }

    /// Whether this range's start falls inside `other`.
    pub fn starts_within(&self, other: &TimeRange) -> bool {
        other.contains(self.start)
    }

    /// Whether this range's end falls inside `other`.
    pub fn ends_within(&self, other: &TimeRange) -> bool {
        other.contains(self.end)
    }

    /// Whether this range fully covers `other`.
    pub fn spans(&self, other: &TimeRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Whether the two ranges share any instant: start inside, end inside,
    /// or fully spanning.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.starts_within(other) || self.ends_within(other) || self.spans(other)
    }

    /// Constrain this range to lie inside `bounds`.
    pub fn clamp_to(&self, bounds: &TimeRange) -> TimeRange {
        TimeRange::new(
            self.start.max(bounds.start).min(bounds.end),
            self.end.min(bounds.end).max(bounds.start),
        )
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} .. {}]",
            format_instant(self.start),
            format_instant(self.end)
        )
    }
}

/// Position of an instant relative to a reference interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgePosition {
    Before,
    Within,
    After,
}

/// Classify an instant against a reference interval.
pub fn classify(t: f64, reference: &TimeRange) -> EdgePosition {
    if t < reference.start {
        EdgePosition::Before
    } else if t > reference.end {
        EdgePosition::After
    } else {
        EdgePosition::Within
    }
}

/// Format an epoch-seconds instant as UTC `HH:MM:SS.mmm`, falling back to
/// the raw number when it is outside the representable range.
pub fn format_instant(t: f64) -> String {
    if !t.is_finite() {
        return format!("{t}");
    }
    let secs = t.floor() as i64;
    let nanos = ((t - t.floor()) * 1e9).round() as u32;
    match chrono::DateTime::from_timestamp(secs, nanos.min(999_999_999)) {
        Some(dt) => dt.format("%H:%M:%S%.3f").to_string(),
        None => format!("{t:.3}"),
    }
}
