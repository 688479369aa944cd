//! QC segments, processing masks, and the visibility keys that gate their
//! display.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::current;
use crate::display::interval::TimeRange;

/// Category a QC segment version was filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QcSegmentCategory {
    AnalystDefined,
    DataAuthentication,
    LongTerm,
    StationSoh,
    Unprocessed,
    Waveform,
}

/// Kind of data problem the segment marks. `Gap` is synthetic and is never
/// drawn as a mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QcSegmentType {
    Aggregate,
    Calibration,
    Flat,
    Gap,
    Noisy,
    SensorProblem,
    Spike,
    Timing,
}

/// One version of a QC segment (current = last in the owning segment's
/// history).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QcSegmentVersion {
    pub range: TimeRange,
    pub category: QcSegmentCategory,
    pub segment_type: QcSegmentType,
    pub rejected: bool,
}

/// A QC annotation on one channel, with its version history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QcSegment {
    pub id: Uuid,
    /// Owning channel name.
    pub channel: String,
    pub versions: Vec<QcSegmentVersion>,
}

impl QcSegment {
    pub fn current_version(&self) -> Option<&QcSegmentVersion> {
        current(&self.versions)
    }
}

/// A correction applied to a channel, referencing the QC segment versions it
/// masked (current = last).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingMask {
    pub id: Uuid,
    /// Channel the mask applies to.
    pub applied_to_channel: String,
    pub masked_versions: Vec<QcSegmentVersion>,
    pub range: TimeRange,
}

impl ProcessingMask {
    pub fn current_version(&self) -> Option<&QcSegmentVersion> {
        current(&self.masked_versions)
    }
}

/// Key into the analyst's mask-visibility map. Categories map one-to-one;
/// rejected versions and processing masks get their own toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MaskVisibilityKey {
    AnalystDefined,
    DataAuthentication,
    LongTerm,
    StationSoh,
    Unprocessed,
    Waveform,
    Rejected,
    ProcessingMasks,
}

impl MaskVisibilityKey {
    /// Effective key for a QC segment version: its category, or `Rejected`
    /// when the version is rejected.
    pub fn for_version(version: &QcSegmentVersion) -> Self {
        if version.rejected {
            MaskVisibilityKey::Rejected
        } else {
            version.category.into()
        }
    }
}

impl From<QcSegmentCategory> for MaskVisibilityKey {
    fn from(category: QcSegmentCategory) -> Self {
        match category {
            QcSegmentCategory::AnalystDefined => MaskVisibilityKey::AnalystDefined,
            QcSegmentCategory::DataAuthentication => MaskVisibilityKey::DataAuthentication,
            QcSegmentCategory::LongTerm => MaskVisibilityKey::LongTerm,
            QcSegmentCategory::StationSoh => MaskVisibilityKey::StationSoh,
            QcSegmentCategory::Unprocessed => MaskVisibilityKey::Unprocessed,
            QcSegmentCategory::Waveform => MaskVisibilityKey::Waveform,
        }
    }
}

impl fmt::Display for MaskVisibilityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaskVisibilityKey::AnalystDefined => write!(f, "Analyst defined"),
            MaskVisibilityKey::DataAuthentication => write!(f, "Data authentication"),
            MaskVisibilityKey::LongTerm => write!(f, "Long term"),
            MaskVisibilityKey::StationSoh => write!(f, "Station SOH"),
            MaskVisibilityKey::Unprocessed => write!(f, "Unprocessed"),
            MaskVisibilityKey::Waveform => write!(f, "Waveform"),
            MaskVisibilityKey::Rejected => write!(f, "Rejected"),
            MaskVisibilityKey::ProcessingMasks => write!(f, "Processing masks"),
        }
    }
}
