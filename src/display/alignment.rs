//! Alignment offsets: per-station time shifts that line arrivals up
//! visually, anchored to a base station.

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::display::params::AlignmentMode;
use crate::types::detection::SignalDetection;
use crate::types::event::{find_open_event, Event};
use crate::types::prediction::{predicted_arrival, FeaturePrediction};

/// Station name → signed seconds offset, with the anchoring base time kept
/// alongside. An absent `base_station_time` means alignment could not be
/// computed; callers fall back to time alignment (all offsets zero).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OffsetMap {
    pub base_station_time: Option<f64>,
    pub offsets: BTreeMap<String, f64>,
}

impl OffsetMap {
    /// Offset for a station; zero when none was computed.
    pub fn offset_for(&self, station: &str) -> f64 {
        self.offsets.get(station).copied().unwrap_or(0.0)
    }

    pub fn is_available(&self) -> bool {
        self.base_station_time.is_some()
    }
}

/// Predicted-phase alignment: anchor on the base station's predicted
/// arrival; every other station with a prediction for the same phase gets
/// `base_station_time - station_arrival`. Stations without one are omitted.
pub fn predicted_phase_offsets(
    base_station: &str,
    phase: &str,
    predictions: &[FeaturePrediction],
) -> OffsetMap {
    let Some(base) = predicted_arrival(predictions, base_station, phase) else {
        return OffsetMap::default();
    };
    let base_time = base.predicted_time;

    let mut map = OffsetMap {
        base_station_time: Some(base_time),
        offsets: BTreeMap::new(),
    };
    for p in predictions.iter().filter(|p| p.phase == phase) {
        map.offsets
            .entry(p.station.clone())
            .or_insert(base_time - p.predicted_time);
    }
    map
}

/// Observed-phase alignment: anchor on the base station's event-associated
/// detection of the phase, or its predicted arrival when no such detection
/// exists. Qualifying detections contribute observed offsets; every other
/// station with a prediction gets a predicted fallback, merged in without
/// overwriting observed entries.
pub fn observed_phase_offsets(
    base_station: &str,
    phase: &str,
    detections: &[SignalDetection],
    events: &[Event],
    open_event_id: Option<Uuid>,
    stage: &str,
    predictions: &[FeaturePrediction],
) -> OffsetMap {
    let open_event = find_open_event(events, open_event_id);

    // Detections whose current hypothesis is associated to the open event
    // and measures the target phase.
    let qualifying: Vec<(&str, f64)> = detections
        .iter()
        .filter_map(|d| {
            let hypothesis = d.current_hypothesis()?;
            let event = open_event?;
            if !event.is_associated(stage, hypothesis.id) {
                return None;
            }
            if d.phase() != Some(phase) {
                return None;
            }
            let arrival = d.arrival_time().filter(|t| t.is_finite())?;
            Some((d.station.as_str(), arrival))
        })
        .collect();

    let base_time = qualifying
        .iter()
        .find(|(station, _)| *station == base_station)
        .map(|(_, arrival)| *arrival)
        .or_else(|| {
            predicted_arrival(predictions, base_station, phase).map(|p| p.predicted_time)
        });
    let Some(base_time) = base_time else {
        return OffsetMap::default();
    };

    let mut map = OffsetMap {
        base_station_time: Some(base_time),
        offsets: BTreeMap::new(),
    };
    for (station, arrival) in &qualifying {
        map.offsets
            .entry(station.to_string())
            .or_insert(base_time - arrival);
    }
    for p in predictions.iter().filter(|p| p.phase == phase) {
        map.offsets
            .entry(p.station.clone())
            .or_insert(base_time - p.predicted_time);
    }
    map
}

/// Dispatch over the alignment mode. `Time` yields an empty map, which
/// reads back as zero offsets everywhere.
#[allow(clippy::too_many_arguments)]
pub fn offsets_for_mode(
    mode: &AlignmentMode,
    base_station: &str,
    detections: &[SignalDetection],
    events: &[Event],
    open_event_id: Option<Uuid>,
    stage: &str,
    predictions: &[FeaturePrediction],
) -> OffsetMap {
    match mode {
        AlignmentMode::Time => OffsetMap::default(),
        AlignmentMode::PredictedPhase(phase) => {
            predicted_phase_offsets(base_station, phase, predictions)
        }
        AlignmentMode::ObservedPhase(phase) => observed_phase_offsets(
            base_station,
            phase,
            detections,
            events,
            open_event_id,
            stage,
            predictions,
        ),
    }
}
