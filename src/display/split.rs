//! Channel splitting: when an instant on a station's default channel falls
//! inside more than one waveform segment, the row expands into one split
//! channel per overlapping segment so the analyst can pick the one they
//! meant.

use std::sync::Arc;

use crate::display::interval::format_instant;
use crate::display::tree::{
    ChannelKind, DisplayChannel, DisplayStation, DisplayTree, SplitState,
};
use crate::error::DisplayError;
use crate::types::station::common_station;
use crate::types::waveform::{FilterSegmentMap, SegmentRecord, WaveformSegment};

/// Deterministic split-channel id for one segment of a station's default
/// channel. Stable across rebuilds for the same segment bounds.
fn split_channel_id(station_id: &str, segment: &WaveformSegment) -> String {
    format!(
        "{}/split/{:.3}-{:.3}",
        station_id, segment.start, segment.end
    )
}

/// Segments of the default channel's active filter containing the instant.
fn overlapping_segments<'a>(
    station: &'a DisplayStation,
    instant: f64,
) -> Vec<&'a WaveformSegment> {
    station
        .default_channel
        .active_segments()
        .map(|record| {
            record
                .segments
                .iter()
                .filter(|seg| seg.contains(instant))
                .collect()
        })
        .unwrap_or_default()
}

/// Whether the instant is ambiguous on this station's default channel:
/// more than one segment under the active filter contains it.
pub fn needs_split(station: &DisplayStation, instant: f64) -> bool {
    overlapping_segments(station, instant).len() > 1
}

fn split_channel_from_segment(
    station: &DisplayStation,
    segment: &WaveformSegment,
) -> DisplayChannel {
    let default = &station.default_channel;
    let filter_label = default.description.filter_label.clone();

    let mut segments_by_filter = FilterSegmentMap::new();
    segments_by_filter.insert(
        filter_label.clone(),
        SegmentRecord {
            segments: vec![segment.clone()],
            filter_failed: false,
        },
    );

    // Only the picks measured on this specific segment ride along.
    let reference = segment.reference();
    let picks = default
        .picks
        .iter()
        .filter(|pick| pick.waveform.as_ref() == Some(&reference))
        .cloned()
        .collect();

    DisplayChannel {
        id: split_channel_id(&station.id, segment),
        kind: ChannelKind::Split,
        label: format!("{} {}", station.id, format_instant(segment.start)),
        time_offset_sec: default.time_offset_sec,
        segments_by_filter,
        description: default.description.clone(),
        picks,
        predicted_phases: Vec::new(),
        masks: Vec::new(),
        boundaries: default.boundaries.clone(),
        selection_windows: Vec::new(),
        split: None,
    }
}

/// Split one station's default channel at an instant. Stations other than
/// the target keep their previous allocation. When fewer than two segments
/// contain the instant there is nothing to disambiguate and the tree is
/// returned unchanged.
pub fn split_station_channels(
    tree: &[Arc<DisplayStation>],
    station_id: &str,
    instant: f64,
    phase: &str,
) -> Result<DisplayTree, DisplayError> {
    let target = tree
        .iter()
        .find(|s| s.id == station_id)
        .ok_or_else(|| DisplayError::UnknownStation(station_id.to_string()))?;
    target.default_channel.expect_kind(ChannelKind::Default)?;

    let segments = overlapping_segments(target, instant);
    // All overlapping segments must come off channels of this station.
    if let Some(owner) = common_station(segments.iter().map(|s| s.channel.as_str()))? {
        if owner != station_id {
            return Err(DisplayError::MixedStations {
                first: station_id.to_string(),
                second: owner.to_string(),
            });
        }
    }
    if segments.len() < 2 {
        log::debug!(
            "split request on {station_id} at {} matched {} segment(s); nothing to split",
            format_instant(instant),
            segments.len()
        );
        return Ok(tree.iter().map(Arc::clone).collect());
    }

    let split_channels: Vec<Arc<DisplayChannel>> = segments
        .iter()
        .map(|segment| Arc::new(split_channel_from_segment(target, segment)))
        .collect();

    let mut default_channel = (*target.default_channel).clone();
    default_channel.split = Some(SplitState {
        instant,
        phase: phase.to_string(),
    });

    let station = Arc::new(DisplayStation {
        id: target.id.clone(),
        default_channel: Arc::new(default_channel),
        detail_channels: target.detail_channels.clone(),
        split_channels,
        expanded: target.expanded,
        has_qc_masks: target.has_qc_masks,
        distance_km: target.distance_km,
        azimuth_deg: target.azimuth_deg,
    });

    Ok(tree
        .iter()
        .map(|s| {
            if s.id == station_id {
                Arc::clone(&station)
            } else {
                Arc::clone(s)
            }
        })
        .collect())
}

/// Remove all split state from the tree. Stations without any split keep
/// their previous allocation.
pub fn clear_split_channels(tree: &[Arc<DisplayStation>]) -> DisplayTree {
    tree.iter()
        .map(|station| {
            if station.split_channels.is_empty() && station.default_channel.split.is_none() {
                return Arc::clone(station);
            }
            let mut default_channel = (*station.default_channel).clone();
            default_channel.split = None;
            Arc::new(DisplayStation {
                id: station.id.clone(),
                default_channel: Arc::new(default_channel),
                detail_channels: station.detail_channels.clone(),
                split_channels: Vec::new(),
                expanded: station.expanded,
                has_qc_masks: station.has_qc_masks,
                distance_km: station.distance_km,
                azimuth_deg: station.azimuth_deg,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::tree::{AssociationStatus, ChannelDescription, PickMarker};
    use crate::theme::DisplayTheme;
    use uuid::Uuid;

    fn segment(start: f64, end: f64) -> WaveformSegment {
        WaveformSegment {
            channel: "ASAR.beam.SHZ".to_string(),
            start,
            end,
        }
    }

    fn pick_on(segment: &WaveformSegment, time: f64) -> PickMarker {
        PickMarker {
            detection_id: Uuid::new_v4(),
            time,
            uncertainty_sec: None,
            phase: "P".to_string(),
            status: AssociationStatus::OpenEvent,
            color: DisplayTheme::default().open_event_pick,
            waveform: Some(segment.reference()),
        }
    }

    fn station_with_segments(segments: Vec<WaveformSegment>, picks: Vec<PickMarker>) -> Arc<DisplayStation> {
        let mut segments_by_filter = FilterSegmentMap::new();
        segments_by_filter.insert(
            "Unfiltered".to_string(),
            SegmentRecord {
                segments,
                filter_failed: false,
            },
        );
        Arc::new(DisplayStation {
            id: "ASAR".to_string(),
            default_channel: Arc::new(DisplayChannel {
                id: "ASAR".to_string(),
                kind: ChannelKind::Default,
                label: "ASAR".to_string(),
                time_offset_sec: 0.0,
                segments_by_filter,
                description: ChannelDescription {
                    filter_label: "Unfiltered".to_string(),
                    filter_error: false,
                },
                picks,
                predicted_phases: Vec::new(),
                masks: Vec::new(),
                boundaries: vec![],
                selection_windows: Vec::new(),
                split: None,
            }),
            detail_channels: Vec::new(),
            split_channels: Vec::new(),
            expanded: false,
            has_qc_masks: false,
            distance_km: None,
            azimuth_deg: None,
        })
    }

    #[test]
    fn test_needs_split_iff_multiple_overlapping_segments() {
        let disjoint = station_with_segments(vec![segment(0.0, 10.0), segment(20.0, 30.0)], vec![]);
        assert!(!needs_split(&disjoint, 5.0));

        let overlapping =
            station_with_segments(vec![segment(0.0, 10.0), segment(5.0, 15.0)], vec![]);
        assert!(needs_split(&overlapping, 7.0));
        assert!(!needs_split(&overlapping, 12.0));
    }

    #[test]
    fn test_split_symmetry_with_needs_split() {
        let station = station_with_segments(vec![segment(0.0, 10.0), segment(5.0, 15.0)], vec![]);
        let tree = vec![Arc::clone(&station)];

        // ambiguous instant: split materializes as many channels as overlap
        let split = split_station_channels(&tree, "ASAR", 7.0, "P").unwrap();
        assert_eq!(split[0].split_channels.len(), 2);
        assert_eq!(
            needs_split(&station, 7.0),
            split[0].split_channels.len() > 1
        );

        // unambiguous instant: unchanged tree, same allocation
        let unsplit = split_station_channels(&tree, "ASAR", 12.0, "P").unwrap();
        assert!(Arc::ptr_eq(&unsplit[0], &tree[0]));
        assert!(unsplit[0].split_channels.is_empty());
    }

    #[test]
    fn test_split_records_state_and_partitions_picks() {
        let seg_a = segment(0.0, 10.0);
        let seg_b = segment(5.0, 15.0);
        let picks = vec![pick_on(&seg_a, 6.0), pick_on(&seg_b, 7.0)];
        let station = station_with_segments(vec![seg_a.clone(), seg_b.clone()], picks);
        let tree = vec![station];

        let split = split_station_channels(&tree, "ASAR", 7.0, "Pn").unwrap();
        let target = &split[0];
        let state = target.default_channel.split.as_ref().unwrap();
        assert_eq!(state.instant, 7.0);
        assert_eq!(state.phase, "Pn");

        assert_eq!(target.split_channels.len(), 2);
        for channel in &target.split_channels {
            assert_eq!(channel.kind, ChannelKind::Split);
            assert_eq!(channel.picks.len(), 1);
            let record = channel.active_segments().unwrap();
            assert_eq!(record.segments.len(), 1);
            assert_eq!(
                channel.picks[0].waveform.as_ref().unwrap(),
                &record.segments[0].reference()
            );
        }
    }

    #[test]
    fn test_split_ids_are_deterministic() {
        let station = station_with_segments(vec![segment(0.0, 10.0), segment(5.0, 15.0)], vec![]);
        let tree = vec![station];
        let first = split_station_channels(&tree, "ASAR", 7.0, "P").unwrap();
        let second = split_station_channels(&tree, "ASAR", 7.0, "P").unwrap();
        let ids = |t: &DisplayTree| -> Vec<String> {
            t[0].split_channels.iter().map(|c| c.id.clone()).collect()
        };
        assert_eq!(ids(&first), ids(&second));
    }

    #[test]
    fn test_clear_split_restores_tree() {
        let station = station_with_segments(vec![segment(0.0, 10.0), segment(5.0, 15.0)], vec![]);
        let tree = vec![station];
        let split = split_station_channels(&tree, "ASAR", 7.0, "P").unwrap();

        let cleared = clear_split_channels(&split);
        assert!(cleared[0].split_channels.is_empty());
        assert!(cleared[0].default_channel.split.is_none());

        // a tree without splits keeps its allocations
        let untouched = clear_split_channels(&cleared);
        assert!(Arc::ptr_eq(&untouched[0], &cleared[0]));
    }

    #[test]
    fn test_split_unknown_station_is_an_error() {
        let station = station_with_segments(vec![segment(0.0, 10.0)], vec![]);
        let tree = vec![station];
        let err = split_station_channels(&tree, "WRA", 5.0, "P").unwrap_err();
        assert!(matches!(err, DisplayError::UnknownStation(_)));
    }

    #[test]
    fn test_split_rejects_foreign_segments() {
        let mut foreign = segment(0.0, 10.0);
        foreign.channel = "WRA.beam.SHZ".to_string();
        let station = station_with_segments(vec![segment(2.0, 12.0), foreign], vec![]);
        let tree = vec![station];
        let err = split_station_channels(&tree, "ASAR", 5.0, "P").unwrap_err();
        assert!(matches!(err, DisplayError::MixedStations { .. }));
    }
}
