//! Signal detections and their hypothesis histories.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::current;
use super::waveform::WaveformRef;

/// Arrival-time feature measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrivalTimeMeasurement {
    /// Epoch seconds.
    pub time: f64,
    /// One standard deviation, seconds.
    pub uncertainty_sec: Option<f64>,
    /// Waveform the measurement was made on; used to match pick markers to
    /// raw and split channels.
    pub waveform: Option<WaveformRef>,
}

/// A5/2 amplitude feature measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmplitudeMeasurement {
    pub amplitude: f64,
    /// Full period of the measured cycle, seconds.
    pub period_sec: f64,
    /// Epoch seconds of the measured peak/trough pair.
    pub measurement_time: f64,
}

/// The feature measurements attached to one hypothesis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureMeasurements {
    pub arrival: Option<ArrivalTimeMeasurement>,
    pub phase: Option<String>,
    pub amplitude_a5_over_2: Option<AmplitudeMeasurement>,
}

/// One versioned claim that a signal was detected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalDetectionHypothesis {
    pub id: Uuid,
    pub deleted: bool,
    pub measurements: FeatureMeasurements,
}

/// A signal detection with its ordered hypothesis history
/// (current = last element).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalDetection {
    pub id: Uuid,
    /// Owning station name.
    pub station: String,
    pub hypotheses: Vec<SignalDetectionHypothesis>,
}

impl SignalDetection {
    pub fn current_hypothesis(&self) -> Option<&SignalDetectionHypothesis> {
        current(&self.hypotheses)
    }

    /// Arrival time of the current hypothesis, if one is measured.
    pub fn arrival_time(&self) -> Option<f64> {
        self.current_hypothesis()
            .and_then(|h| h.measurements.arrival.as_ref())
            .map(|a| a.time)
    }

    /// Phase label of the current hypothesis.
    pub fn phase(&self) -> Option<&str> {
        self.current_hypothesis()
            .and_then(|h| h.measurements.phase.as_deref())
    }

    /// Whether the current hypothesis is flagged deleted (or absent).
    pub fn is_deleted(&self) -> bool {
        self.current_hypothesis().map_or(true, |h| h.deleted)
    }
}
