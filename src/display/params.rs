//! The explicit parameter bundle driving a tree build. Everything the
//! builder reads arrives here; there is no ambient configuration.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::display::interval::TimeRange;
use crate::types::detection::SignalDetection;
use crate::types::event::Event;
use crate::types::filter::Filter;
use crate::types::prediction::FeaturePrediction;
use crate::types::qc::{MaskVisibilityKey, ProcessingMask, QcSegment};
use crate::types::station::Station;
use crate::types::waveform::ChannelSegmentMap;

/// Interaction mode of the waveform display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaveformMode {
    #[default]
    Default,
    /// Amplitude-measurement mode: restricted stations, selection windows.
    Measurement,
}

impl WaveformMode {
    pub fn is_measurement(&self) -> bool {
        matches!(self, WaveformMode::Measurement)
    }
}

/// Station sort order for the tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    StationNameAsc,
    StationNameDesc,
    /// Ascending distance to the open event; stations without a distance
    /// sort last.
    DistanceAsc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::StationNameAsc => write!(f, "Station name (A-Z)"),
            SortOrder::StationNameDesc => write!(f, "Station name (Z-A)"),
            SortOrder::DistanceAsc => write!(f, "Distance"),
        }
    }
}

/// How waveforms are aligned across stations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlignmentMode {
    /// Absolute time; every offset is zero.
    #[default]
    Time,
    /// Align on observed arrivals of a phase, with predicted fallback.
    ObservedPhase(String),
    /// Align on predicted arrivals of a phase.
    PredictedPhase(String),
}

impl AlignmentMode {
    pub fn phase(&self) -> Option<&str> {
        match self {
            AlignmentMode::Time => None,
            AlignmentMode::ObservedPhase(p) | AlignmentMode::PredictedPhase(p) => Some(p),
        }
    }
}

impl fmt::Display for AlignmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlignmentMode::Time => write!(f, "Time"),
            AlignmentMode::ObservedPhase(p) => write!(f, "Observed {p}"),
            AlignmentMode::PredictedPhase(p) => write!(f, "Predicted {p}"),
        }
    }
}

/// Per-station visibility and expansion state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationVisibility {
    pub visible: bool,
    pub expanded: bool,
}

impl Default for StationVisibility {
    fn default() -> Self {
        StationVisibility {
            visible: true,
            expanded: false,
        }
    }
}

/// Fixed builder configuration: measurement-window offsets and the phases
/// whose predictions are drawn on default channels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Arrival-window start relative to the arrival time, seconds (negative
    /// means before the arrival).
    pub arrival_lead_sec: f64,
    /// Arrival-window end relative to the arrival time, seconds.
    pub arrival_lag_sec: f64,
    pub priority_phases: Vec<String>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            arrival_lead_sec: -0.5,
            arrival_lag_sec: 5.0,
            priority_phases: ["P", "Pn", "Pg", "S", "Sn", "Sg", "Lg"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Everything a tree build consumes. Pure input: a build never mutates it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayInputs {
    pub stations: Vec<Station>,

    /// Per-station visibility; stations absent from the map use the default
    /// (visible, collapsed).
    #[serde(default)]
    pub station_visibility: BTreeMap<String, StationVisibility>,
    /// Raw channels hidden by the analyst.
    #[serde(default)]
    pub hidden_channels: BTreeSet<String>,

    #[serde(default)]
    pub signal_detections: Vec<SignalDetection>,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub open_event_id: Option<Uuid>,
    /// Active analysis stage name.
    #[serde(default)]
    pub stage: String,

    #[serde(default)]
    pub predictions: Vec<FeaturePrediction>,

    /// QC segments grouped by owning channel.
    #[serde(default)]
    pub qc_segments_by_channel: BTreeMap<String, Vec<QcSegment>>,
    #[serde(default)]
    pub processing_masks: Vec<ProcessingMask>,
    /// Visibility per mask key; missing keys default to visible.
    #[serde(default)]
    pub mask_visibility: BTreeMap<MaskVisibilityKey, bool>,

    /// Active filter per station; missing stations are unfiltered.
    #[serde(default)]
    pub selected_filters: BTreeMap<String, Filter>,
    /// Channel name → filter name → segments. Default channels are keyed by
    /// the station name.
    #[serde(default)]
    pub segments: ChannelSegmentMap,

    /// The loaded interval; boundary markers are drawn at its edges.
    #[serde(default)]
    pub view_interval: TimeRange,
    /// The currently zoomed interval; gates the station has-masks flag.
    #[serde(default)]
    pub zoom_interval: TimeRange,

    #[serde(default)]
    pub mode: WaveformMode,
    /// Measurement-mode overrides: detection id → force show/hide.
    #[serde(default)]
    pub measurement_overrides: BTreeMap<Uuid, bool>,

    #[serde(default)]
    pub alignment: AlignmentMode,
    /// Station the alignment anchors to; the first sorted visible station
    /// when unset.
    #[serde(default)]
    pub alignment_base: Option<String>,

    #[serde(default)]
    pub sort: SortOrder,

    #[serde(default)]
    pub config: DisplayConfig,
}

impl DisplayInputs {
    /// Visibility entry for a station, defaulted for absent stations.
    pub fn visibility(&self, station: &str) -> StationVisibility {
        self.station_visibility
            .get(station)
            .copied()
            .unwrap_or_default()
    }

    /// Resolved name of the active filter for a station.
    pub fn filter_name(&self, station: &str) -> &str {
        self.selected_filters
            .get(station)
            .map(Filter::name)
            .unwrap_or("Unfiltered")
    }

    /// Whether a mask visibility key is enabled (missing keys are).
    pub fn mask_visible(&self, key: MaskVisibilityKey) -> bool {
        self.mask_visibility.get(&key).copied().unwrap_or(true)
    }
}
