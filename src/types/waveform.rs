//! Waveform segment records. Sample data stays external; this subsystem
//! only sees each segment's identity and data bounds.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Identity of one contiguous waveform: the channel it was recorded or
/// derived on, plus its data bounds in epoch seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveformRef {
    pub channel: String,
    pub start: f64,
    pub end: f64,
}

/// One contiguous run of waveform data under a particular filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveformSegment {
    /// Underlying (possibly derived) channel name.
    pub channel: String,
    pub start: f64,
    pub end: f64,
}

impl WaveformSegment {
    pub fn reference(&self) -> WaveformRef {
        WaveformRef {
            channel: self.channel.clone(),
            start: self.start,
            end: self.end,
        }
    }

    /// Whether an instant falls within this segment's data bounds.
    pub fn contains(&self, t: f64) -> bool {
        self.start <= t && t <= self.end
    }
}

/// The segments available on one channel under one filter, plus the
/// display-only flag raised when that filter could not be applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentRecord {
    pub segments: Vec<WaveformSegment>,
    #[serde(default)]
    pub filter_failed: bool,
}

/// Filter name → segment record, for one channel.
pub type FilterSegmentMap = BTreeMap<String, SegmentRecord>;

/// Channel name → per-filter segment records. A station's default channel
/// is keyed by the station name itself.
pub type ChannelSegmentMap = BTreeMap<String, FilterSegmentMap>;
