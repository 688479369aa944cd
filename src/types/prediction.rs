//! Model-predicted arrival times per station/phase pair.

use serde::{Deserialize, Serialize};

/// A predicted arrival for one receiver station and phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeaturePrediction {
    /// Receiver station name.
    pub station: String,
    pub phase: String,
    /// Predicted arrival, epoch seconds.
    pub predicted_time: f64,
    /// Set when the prediction was computed outside validated model bounds.
    pub extrapolated: bool,
}

/// First prediction matching a station/phase pair.
pub fn predicted_arrival<'a>(
    predictions: &'a [FeaturePrediction],
    station: &str,
    phase: &str,
) -> Option<&'a FeaturePrediction> {
    predictions
        .iter()
        .find(|p| p.station == station && p.phase == phase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicted_arrival_lookup() {
        let predictions = vec![
            FeaturePrediction {
                station: "ASAR".to_string(),
                phase: "P".to_string(),
                predicted_time: 150.0,
                extrapolated: false,
            },
            FeaturePrediction {
                station: "ASAR".to_string(),
                phase: "S".to_string(),
                predicted_time: 260.0,
                extrapolated: true,
            },
        ];
        assert_eq!(
            predicted_arrival(&predictions, "ASAR", "S").unwrap().predicted_time,
            260.0
        );
        assert!(predicted_arrival(&predictions, "WRA", "P").is_none());
    }
}
