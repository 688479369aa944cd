//! Mask aggregation: QC segments and processing masks become drawable mask
//! intervals, gated by the analyst's per-category visibility map.

use std::collections::BTreeMap;

use crate::display::interval::TimeRange;
use crate::display::tree::MaskMarker;
use crate::theme::DisplayTheme;
use crate::types::qc::{MaskVisibilityKey, ProcessingMask, QcSegment, QcSegmentType};
use crate::types::station::Channel;

fn key_enabled(visibility: &BTreeMap<MaskVisibilityKey, bool>, key: MaskVisibilityKey) -> bool {
    visibility.get(&key).copied().unwrap_or(true)
}

/// Aggregate the drawable masks for one channel: the current version of each
/// of its QC segments (gaps never draw; rejected versions use the rejected
/// toggle) plus the channel's processing mask when its toggle is on.
pub fn build_masks(
    channel: &str,
    qc_segments_by_channel: &BTreeMap<String, Vec<QcSegment>>,
    processing_mask: Option<&ProcessingMask>,
    theme: &DisplayTheme,
    visibility: &BTreeMap<MaskVisibilityKey, bool>,
) -> Vec<MaskMarker> {
    let mut masks = Vec::new();

    if let Some(segments) = qc_segments_by_channel.get(channel) {
        for segment in segments {
            let Some(version) = segment.current_version() else {
                continue;
            };
            if version.segment_type == QcSegmentType::Gap {
                continue;
            }
            let key = MaskVisibilityKey::for_version(version);
            if !key_enabled(visibility, key) {
                continue;
            }
            masks.push(MaskMarker {
                id: segment.id,
                range: version.range,
                key,
                color: theme.mask_color(key),
            });
        }
    }

    if let Some(mask) = processing_mask {
        if mask.applied_to_channel == channel
            && key_enabled(visibility, MaskVisibilityKey::ProcessingMasks)
        {
            if let Some(version) = mask.current_version() {
                masks.push(MaskMarker {
                    id: mask.id,
                    range: version.range,
                    key: MaskVisibilityKey::ProcessingMasks,
                    color: theme.mask_color(MaskVisibilityKey::ProcessingMasks),
                });
            }
        }
    }

    masks
}

/// Whether any aggregated mask across a station's raw channels overlaps the
/// zoom interval: start inside, end inside, or fully spanning.
pub fn station_has_masks(
    channels: &[Channel],
    qc_segments_by_channel: &BTreeMap<String, Vec<QcSegment>>,
    processing_masks: &[ProcessingMask],
    theme: &DisplayTheme,
    visibility: &BTreeMap<MaskVisibilityKey, bool>,
    zoom_interval: &TimeRange,
) -> bool {
    channels.iter().any(|channel| {
        let processing_mask = processing_masks
            .iter()
            .find(|m| m.applied_to_channel == channel.name);
        build_masks(
            &channel.name,
            qc_segments_by_channel,
            processing_mask,
            theme,
            visibility,
        )
        .iter()
        .any(|mask| mask.range.overlaps(zoom_interval))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::qc::{QcSegmentCategory, QcSegmentVersion};
    use uuid::Uuid;

    const CHANNEL: &str = "ASAR.AS01.SHZ";

    fn qc_segment(
        category: QcSegmentCategory,
        segment_type: QcSegmentType,
        rejected: bool,
        range: TimeRange,
    ) -> QcSegment {
        QcSegment {
            id: Uuid::new_v4(),
            channel: CHANNEL.to_string(),
            versions: vec![QcSegmentVersion {
                range,
                category,
                segment_type,
                rejected,
            }],
        }
    }

    fn by_channel(segments: Vec<QcSegment>) -> BTreeMap<String, Vec<QcSegment>> {
        let mut map = BTreeMap::new();
        map.insert(CHANNEL.to_string(), segments);
        map
    }

    #[test]
    fn test_build_masks_is_idempotent_and_toggle_restores() {
        let segments = by_channel(vec![qc_segment(
            QcSegmentCategory::Waveform,
            QcSegmentType::Spike,
            false,
            TimeRange::new(10.0, 20.0),
        )]);
        let theme = DisplayTheme::default();
        let mut visibility = BTreeMap::new();

        let first = build_masks(CHANNEL, &segments, None, &theme, &visibility);
        let second = build_masks(CHANNEL, &segments, None, &theme, &visibility);
        assert_eq!(first, second);
        assert_eq!(first.len(), 1);

        visibility.insert(MaskVisibilityKey::Waveform, false);
        assert!(build_masks(CHANNEL, &segments, None, &theme, &visibility).is_empty());

        visibility.insert(MaskVisibilityKey::Waveform, true);
        assert_eq!(build_masks(CHANNEL, &segments, None, &theme, &visibility), first);
    }

    #[test]
    fn test_gap_segments_never_draw() {
        let segments = by_channel(vec![qc_segment(
            QcSegmentCategory::Waveform,
            QcSegmentType::Gap,
            false,
            TimeRange::new(10.0, 20.0),
        )]);
        let masks = build_masks(
            CHANNEL,
            &segments,
            None,
            &DisplayTheme::default(),
            &BTreeMap::new(),
        );
        assert!(masks.is_empty());
    }

    #[test]
    fn test_rejected_versions_use_rejected_toggle() {
        let segments = by_channel(vec![qc_segment(
            QcSegmentCategory::Waveform,
            QcSegmentType::Spike,
            true,
            TimeRange::new(10.0, 20.0),
        )]);
        let theme = DisplayTheme::default();

        let mut visibility = BTreeMap::new();
        // turning the category off does not hide a rejected version
        visibility.insert(MaskVisibilityKey::Waveform, false);
        let masks = build_masks(CHANNEL, &segments, None, &theme, &visibility);
        assert_eq!(masks.len(), 1);
        assert_eq!(masks[0].key, MaskVisibilityKey::Rejected);

        visibility.insert(MaskVisibilityKey::Rejected, false);
        assert!(build_masks(CHANNEL, &segments, None, &theme, &visibility).is_empty());
    }

    #[test]
    fn test_processing_mask_uses_current_masked_version_interval() {
        let mask = ProcessingMask {
            id: Uuid::new_v4(),
            applied_to_channel: CHANNEL.to_string(),
            masked_versions: vec![
                QcSegmentVersion {
                    range: TimeRange::new(0.0, 1.0),
                    category: QcSegmentCategory::Waveform,
                    segment_type: QcSegmentType::Spike,
                    rejected: false,
                },
                QcSegmentVersion {
                    range: TimeRange::new(30.0, 40.0),
                    category: QcSegmentCategory::Waveform,
                    segment_type: QcSegmentType::Spike,
                    rejected: false,
                },
            ],
            range: TimeRange::new(0.0, 100.0),
        };
        let theme = DisplayTheme::default();

        let masks = build_masks(CHANNEL, &BTreeMap::new(), Some(&mask), &theme, &BTreeMap::new());
        assert_eq!(masks.len(), 1);
        assert_eq!(masks[0].range, TimeRange::new(30.0, 40.0));

        let mut visibility = BTreeMap::new();
        visibility.insert(MaskVisibilityKey::ProcessingMasks, false);
        assert!(build_masks(CHANNEL, &BTreeMap::new(), Some(&mask), &theme, &visibility).is_empty());

        // a mask for some other channel never draws here
        let masks = build_masks("WRA.W01.BHZ", &BTreeMap::new(), Some(&mask), &theme, &BTreeMap::new());
        assert!(masks.is_empty());
    }

    #[test]
    fn test_station_has_masks_overlap_with_zoom() {
        let segments = by_channel(vec![qc_segment(
            QcSegmentCategory::Waveform,
            QcSegmentType::Spike,
            false,
            TimeRange::new(10.0, 20.0),
        )]);
        let channels = vec![Channel {
            name: CHANNEL.to_string(),
            location: None,
            sample_rate_hz: 40.0,
        }];
        let theme = DisplayTheme::default();
        let visibility = BTreeMap::new();

        let overlapping = TimeRange::new(15.0, 50.0);
        assert!(station_has_masks(
            &channels, &segments, &[], &theme, &visibility, &overlapping
        ));

        let disjoint = TimeRange::new(30.0, 50.0);
        assert!(!station_has_masks(
            &channels, &segments, &[], &theme, &visibility, &disjoint
        ));
    }
}
