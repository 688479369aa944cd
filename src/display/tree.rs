//! The renderable station/channel tree handed to the rendering surface.
//!
//! Stations and channels are `Arc`-wrapped so the incremental updater can
//! hand back the previous build's allocation for unchanged subtrees; the
//! renderer treats pointer-identical nodes as "no redraw needed".

use std::fmt;
use std::sync::Arc;

use egui::Color32;
use uuid::Uuid;

use crate::display::interval::TimeRange;
use crate::error::DisplayError;
use crate::types::qc::MaskVisibilityKey;
use crate::types::waveform::{FilterSegmentMap, WaveformRef};

/// What role a channel plays in its station row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    /// The station row itself, keyed by the station name.
    Default,
    /// One raw channel, shown when the station is expanded.
    Detail,
    /// A disambiguation channel produced by splitting an overlapping instant.
    Split,
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelKind::Default => write!(f, "default"),
            ChannelKind::Detail => write!(f, "detail"),
            ChannelKind::Split => write!(f, "split"),
        }
    }
}

/// How a detection relates to the event set at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssociationStatus {
    /// Associated to the open event.
    OpenEvent,
    /// Associated to a completed event.
    CompleteEvent,
    /// Associated to some other event.
    OtherEvent,
    Unassociated,
}

/// A signal-detection pick drawn on a channel.
#[derive(Debug, Clone, PartialEq)]
pub struct PickMarker {
    pub detection_id: Uuid,
    /// Arrival time, epoch seconds.
    pub time: f64,
    pub uncertainty_sec: Option<f64>,
    pub phase: String,
    pub status: AssociationStatus,
    pub color: Color32,
    /// Waveform the arrival was measured on, when known.
    pub waveform: Option<WaveformRef>,
}

/// A model-predicted phase arrival drawn on the default channel.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictedPhaseMarker {
    pub phase: String,
    pub time: f64,
    pub color: Color32,
}

/// A drawable QC/processing mask interval.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskMarker {
    pub id: Uuid,
    pub range: TimeRange,
    pub key: MaskVisibilityKey,
    pub color: Color32,
}

/// Vertical line at an interval boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryMarker {
    pub time: f64,
    pub color: Color32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectionKind {
    /// Fixed lead/lag window around the arrival time.
    Arrival,
    /// Amplitude peak/trough half-period window; `warning` is set when the
    /// raw positions fell outside the arrival window and had to be clamped.
    PeakTrough { warning: bool },
}

/// A measurement-mode selection window on the default channel.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionWindow {
    pub detection_id: Uuid,
    pub kind: SelectionKind,
    pub range: TimeRange,
    pub draggable: bool,
    pub fill: Color32,
    pub stroke: Color32,
}

/// Display description line under a channel label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelDescription {
    /// Resolved name of the active filter.
    pub filter_label: String,
    /// Set when the active filter could not be applied to this channel's
    /// data; the channel still renders, unfiltered.
    pub filter_error: bool,
}

/// Interaction state recorded on a default channel while it is split.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitState {
    /// The ambiguous instant the analyst picked.
    pub instant: f64,
    /// Phase of the interaction that triggered the split, so it can resume
    /// once a specific split channel is chosen.
    pub phase: String,
}

/// One renderable channel row.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayChannel {
    /// Channel name for detail channels; the station name for default
    /// channels; derived deterministically for split channels.
    pub id: String,
    pub kind: ChannelKind,
    pub label: String,
    /// Signed alignment offset applied to this channel's waveforms.
    pub time_offset_sec: f64,
    pub segments_by_filter: FilterSegmentMap,
    pub description: ChannelDescription,
    pub picks: Vec<PickMarker>,
    pub predicted_phases: Vec<PredictedPhaseMarker>,
    pub masks: Vec<MaskMarker>,
    pub boundaries: Vec<BoundaryMarker>,
    /// Populated on default channels only.
    pub selection_windows: Vec<SelectionWindow>,
    /// Present on a default channel only while it is split.
    pub split: Option<SplitState>,
}

impl DisplayChannel {
    /// Guard for operations that only make sense on one channel kind.
    pub fn expect_kind(&self, expected: ChannelKind) -> Result<(), DisplayError> {
        if self.kind == expected {
            Ok(())
        } else {
            Err(DisplayError::WrongChannelKind {
                expected,
                actual: self.kind,
                id: self.id.clone(),
            })
        }
    }

    /// The segment record for the active filter, when present.
    pub fn active_segments(&self) -> Option<&crate::types::waveform::SegmentRecord> {
        self.segments_by_filter.get(&self.description.filter_label)
    }
}

/// One renderable station row: default channel plus optional detail/split
/// channels. Split channels and visible detail channels are mutually
/// exclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayStation {
    /// Station name.
    pub id: String,
    pub default_channel: Arc<DisplayChannel>,
    /// Detail channels in group/orientation order; shown while expanded.
    pub detail_channels: Vec<Arc<DisplayChannel>>,
    pub split_channels: Vec<Arc<DisplayChannel>>,
    pub expanded: bool,
    /// Whether any mask on the station's raw channels overlaps the zoom
    /// interval.
    pub has_qc_masks: bool,
    /// Great-circle distance to the open event, when one is located.
    pub distance_km: Option<f64>,
    pub azimuth_deg: Option<f64>,
}

/// The full renderable tree, ordered by the active sort.
pub type DisplayTree = Vec<Arc<DisplayStation>>;
