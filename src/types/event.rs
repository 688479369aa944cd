//! Events, event hypotheses, and per-stage preferred hypothesis lookup.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Origin solution attached to an event hypothesis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationSolution {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub depth_km: f64,
    /// Origin time, epoch seconds.
    pub time: f64,
}

/// A versioned claim about an event's location and associations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventHypothesis {
    pub id: Uuid,
    /// Ids of the signal-detection hypotheses associated to this event
    /// hypothesis.
    pub associated_detection_hypotheses: Vec<Uuid>,
    pub location: Option<LocationSolution>,
}

/// Which hypothesis is preferred for one analysis stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StagePreference {
    pub stage: String,
    pub hypothesis_id: Uuid,
}

/// Analyst workflow status of an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventStatus {
    #[default]
    NotStarted,
    InProgress,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub status: EventStatus,
    pub hypotheses: Vec<EventHypothesis>,
    /// One preferred hypothesis per analysis stage.
    pub preferred_by_stage: Vec<StagePreference>,
}

impl Event {
    /// Preferred hypothesis for `stage`. When no entry matches the stage
    /// exactly, the first stage entry stands in.
    pub fn preferred_hypothesis(&self, stage: &str) -> Option<&EventHypothesis> {
        let preference = self
            .preferred_by_stage
            .iter()
            .find(|p| p.stage == stage)
            .or_else(|| self.preferred_by_stage.first())?;
        self.hypotheses
            .iter()
            .find(|h| h.id == preference.hypothesis_id)
    }

    /// Whether a signal-detection hypothesis is associated to this event's
    /// preferred hypothesis for `stage`.
    pub fn is_associated(&self, stage: &str, sdh_id: Uuid) -> bool {
        self.preferred_hypothesis(stage)
            .map_or(false, |h| h.associated_detection_hypotheses.contains(&sdh_id))
    }
}

/// Resolve the open event, when one is set and present.
pub fn find_open_event(events: &[Event], open_event_id: Option<Uuid>) -> Option<&Event> {
    let id = open_event_id?;
    events.iter().find(|e| e.id == id)
}
