//! Selection-window synthesis for measurement mode: an arrival window per
//! eligible detection, plus an amplitude peak/trough window when an A5/2
//! measurement exists.

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::display::interval::TimeRange;
use crate::display::params::{DisplayConfig, WaveformMode};
use crate::display::tree::{SelectionKind, SelectionWindow};
use crate::theme::DisplayTheme;
use crate::types::detection::SignalDetection;
use crate::types::event::{find_open_event, Event};

/// Whether a detection contributes selection windows. Overrides win outright:
/// `true` shows the detection even outside measurement mode, `false` hides
/// an otherwise-eligible one. Without an override, the detection must be
/// associated to the open event's preferred hypothesis for the stage, in
/// measurement mode.
fn is_eligible(
    detection: &SignalDetection,
    events: &[Event],
    open_event_id: Option<Uuid>,
    stage: &str,
    mode: &WaveformMode,
    overrides: &BTreeMap<Uuid, bool>,
) -> bool {
    if let Some(forced) = overrides.get(&detection.id) {
        return *forced;
    }
    if !mode.is_measurement() {
        return false;
    }
    let Some(hypothesis) = detection.current_hypothesis() else {
        return false;
    };
    find_open_event(events, open_event_id)
        .map_or(false, |event| event.is_associated(stage, hypothesis.id))
}

/// Windows for a single detection: nothing when ineligible or when the
/// arrival time is not a finite number.
#[allow(clippy::too_many_arguments)]
pub fn windows_for_detection(
    detection: &SignalDetection,
    events: &[Event],
    open_event_id: Option<Uuid>,
    stage: &str,
    mode: &WaveformMode,
    overrides: &BTreeMap<Uuid, bool>,
    config: &DisplayConfig,
    theme: &DisplayTheme,
) -> Vec<SelectionWindow> {
    if !is_eligible(detection, events, open_event_id, stage, mode, overrides) {
        return Vec::new();
    }
    let Some(arrival) = detection.arrival_time().filter(|t| t.is_finite()) else {
        return Vec::new();
    };

    let arrival_window = TimeRange::new(
        arrival + config.arrival_lead_sec,
        arrival + config.arrival_lag_sec,
    );
    let mut windows = vec![SelectionWindow {
        detection_id: detection.id,
        kind: SelectionKind::Arrival,
        range: arrival_window,
        draggable: mode.is_measurement(),
        fill: theme.selection_fill,
        stroke: theme.selection_stroke,
    }];

    let amplitude = detection
        .current_hypothesis()
        .and_then(|h| h.measurements.amplitude_a5_over_2.as_ref());
    if let Some(amplitude) = amplitude {
        let raw = TimeRange::new(
            amplitude.measurement_time,
            amplitude.measurement_time + amplitude.period_sec / 2.0,
        );
        let clamped = raw.clamp_to(&arrival_window);
        let warning = raw.start < arrival_window.start || raw.end > arrival_window.end;
        windows.push(SelectionWindow {
            detection_id: detection.id,
            kind: SelectionKind::PeakTrough { warning },
            range: clamped,
            draggable: mode.is_measurement() && !warning,
            fill: theme.selection_fill,
            stroke: if warning {
                theme.warning_stroke
            } else {
                theme.selection_stroke
            },
        });
    }
    windows
}

/// Build the selection windows for a set of detections.
#[allow(clippy::too_many_arguments)]
pub fn selection_windows(
    detections: &[SignalDetection],
    events: &[Event],
    open_event_id: Option<Uuid>,
    stage: &str,
    mode: &WaveformMode,
    overrides: &BTreeMap<Uuid, bool>,
    config: &DisplayConfig,
    theme: &DisplayTheme,
) -> Vec<SelectionWindow> {
    detections
        .iter()
        .flat_map(|detection| {
            windows_for_detection(
                detection,
                events,
                open_event_id,
                stage,
                mode,
                overrides,
                config,
                theme,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::detection::{
        AmplitudeMeasurement, ArrivalTimeMeasurement, FeatureMeasurements,
        SignalDetectionHypothesis,
    };
    use crate::types::event::{EventHypothesis, EventStatus, StagePreference};

    fn detection(arrival: f64, amplitude: Option<AmplitudeMeasurement>) -> SignalDetection {
        SignalDetection {
            id: Uuid::new_v4(),
            station: "ASAR".to_string(),
            hypotheses: vec![SignalDetectionHypothesis {
                id: Uuid::new_v4(),
                deleted: false,
                measurements: FeatureMeasurements {
                    arrival: Some(ArrivalTimeMeasurement {
                        time: arrival,
                        uncertainty_sec: None,
                        waveform: None,
                    }),
                    phase: Some("P".to_string()),
                    amplitude_a5_over_2: amplitude,
                },
            }],
        }
    }

    fn open_event_for(detections: &[&SignalDetection]) -> Event {
        let hypothesis = EventHypothesis {
            id: Uuid::new_v4(),
            associated_detection_hypotheses: detections
                .iter()
                .map(|d| d.current_hypothesis().unwrap().id)
                .collect(),
            location: None,
        };
        Event {
            id: Uuid::new_v4(),
            status: EventStatus::InProgress,
            preferred_by_stage: vec![StagePreference {
                stage: "AL1".to_string(),
                hypothesis_id: hypothesis.id,
            }],
            hypotheses: vec![hypothesis],
        }
    }

    fn build(
        detections: &[SignalDetection],
        events: &[Event],
        open: Option<Uuid>,
        mode: WaveformMode,
        overrides: &BTreeMap<Uuid, bool>,
    ) -> Vec<SelectionWindow> {
        selection_windows(
            detections,
            events,
            open,
            "AL1",
            &mode,
            overrides,
            &DisplayConfig::default(),
            &DisplayTheme::default(),
        )
    }

    #[test]
    fn test_unassociated_detection_gets_no_windows() {
        let d = detection(100.0, None);
        let unrelated = open_event_for(&[]);
        let open = Some(unrelated.id);
        let windows = build(
            &[d],
            &[unrelated],
            open,
            WaveformMode::Measurement,
            &BTreeMap::new(),
        );
        assert!(windows.is_empty());
    }

    #[test]
    fn test_associated_detection_gets_arrival_window() {
        let d = detection(100.0, None);
        let event = open_event_for(&[&d]);
        let open = Some(event.id);
        let windows = build(&[d], &[event], open, WaveformMode::Measurement, &BTreeMap::new());
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].kind, SelectionKind::Arrival);
        assert_eq!(windows[0].range, TimeRange::new(99.5, 105.0));
        assert!(windows[0].draggable);
    }

    #[test]
    fn test_override_true_shows_outside_measurement_mode() {
        let d = detection(100.0, None);
        let id = d.id;
        let mut overrides = BTreeMap::new();
        overrides.insert(id, true);
        let windows = build(&[d], &[], None, WaveformMode::Default, &overrides);
        assert_eq!(windows.len(), 1);
        // shown, but not draggable outside measurement mode
        assert!(!windows[0].draggable);
    }

    #[test]
    fn test_override_false_hides_eligible_detection() {
        let d = detection(100.0, None);
        let event = open_event_for(&[&d]);
        let open = Some(event.id);
        let mut overrides = BTreeMap::new();
        overrides.insert(d.id, false);
        let windows = build(&[d], &[event], open, WaveformMode::Measurement, &overrides);
        assert!(windows.is_empty());
    }

    #[test]
    fn test_peak_trough_window_within_bounds() {
        let amplitude = AmplitudeMeasurement {
            amplitude: 12.5,
            period_sec: 2.0,
            measurement_time: 101.0,
        };
        let d = detection(100.0, Some(amplitude));
        let event = open_event_for(&[&d]);
        let open = Some(event.id);
        let windows = build(&[d], &[event], open, WaveformMode::Measurement, &BTreeMap::new());
        assert_eq!(windows.len(), 2);
        let peak = &windows[1];
        assert_eq!(peak.kind, SelectionKind::PeakTrough { warning: false });
        assert_eq!(peak.range, TimeRange::new(101.0, 102.0));
        assert!(peak.draggable);
    }

    #[test]
    fn test_peak_trough_window_clamps_and_warns() {
        // Measurement extends past the arrival window end (105.0).
        let amplitude = AmplitudeMeasurement {
            amplitude: 3.0,
            period_sec: 8.0,
            measurement_time: 103.0,
        };
        let d = detection(100.0, Some(amplitude));
        let event = open_event_for(&[&d]);
        let open = Some(event.id);
        let windows = build(&[d], &[event], open, WaveformMode::Measurement, &BTreeMap::new());
        let peak = &windows[1];
        assert_eq!(peak.kind, SelectionKind::PeakTrough { warning: true });
        assert_eq!(peak.range, TimeRange::new(103.0, 105.0));
        assert!(!peak.draggable);
    }

    #[test]
    fn test_non_finite_arrival_is_skipped() {
        let d = detection(f64::NAN, None);
        let id = d.id;
        let mut overrides = BTreeMap::new();
        overrides.insert(id, true);
        let windows = build(&[d], &[], None, WaveformMode::Measurement, &overrides);
        assert!(windows.is_empty());
    }
}
