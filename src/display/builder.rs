//! The station/channel tree builder: composes alignment, masks, selection
//! windows, and pick markers into the full renderable tree, then reconciles
//! it against the previous build.

use std::cmp::Ordering;
use std::sync::Arc;

use uuid::Uuid;

use crate::display::alignment::{offsets_for_mode, OffsetMap};
use crate::display::diff;
use crate::display::geo;
use crate::display::masks::{build_masks, station_has_masks};
use crate::display::params::{DisplayInputs, SortOrder};
use crate::display::selection::windows_for_detection;
use crate::display::tree::{
    AssociationStatus, BoundaryMarker, ChannelDescription, ChannelKind, DisplayChannel,
    DisplayStation, DisplayTree, PickMarker, PredictedPhaseMarker,
};
use crate::error::DisplayError;
use crate::theme::DisplayTheme;
use crate::types::detection::SignalDetection;
use crate::types::event::{find_open_event, Event, EventStatus, LocationSolution};
use crate::types::station::{parse_channel_name, Station};

/// A visible station with its computed relation to the open event.
struct RankedStation<'a> {
    station: &'a Station,
    distance_km: Option<f64>,
    azimuth_deg: Option<f64>,
}

/// Build the full display tree. When a previous tree is supplied, stations
/// and channels whose content did not change keep their previous `Arc`
/// allocation (see [`diff`]).
pub fn build_display_tree(
    inputs: &DisplayInputs,
    theme: &DisplayTheme,
    previous: Option<&[Arc<DisplayStation>]>,
) -> Result<DisplayTree, DisplayError> {
    let associated = associated_hypothesis_ids(inputs);

    let mut visible: Vec<&Station> = inputs
        .stations
        .iter()
        .filter(|s| inputs.visibility(&s.name).visible)
        .collect();

    // Measurement mode shows only stations contributing to the open event.
    if inputs.mode.is_measurement() {
        visible.retain(|station| {
            inputs.signal_detections.iter().any(|d| {
                d.station == station.name
                    && d.current_hypothesis()
                        .map_or(false, |h| associated.contains(&h.id))
            })
        });
    }

    let event_location = find_open_event(&inputs.events, inputs.open_event_id)
        .and_then(|e| e.preferred_hypothesis(&inputs.stage))
        .and_then(|h| h.location);

    let mut ranked: Vec<RankedStation> = visible
        .into_iter()
        .map(|station| rank_station(station, event_location.as_ref()))
        .collect();
    sort_stations(&mut ranked, inputs.sort);

    let base_station = inputs
        .alignment_base
        .as_deref()
        .or_else(|| ranked.first().map(|r| r.station.name.as_str()));
    let offsets = match base_station {
        Some(base) => offsets_for_mode(
            &inputs.alignment,
            base,
            &inputs.signal_detections,
            &inputs.events,
            inputs.open_event_id,
            &inputs.stage,
            &inputs.predictions,
        ),
        None => OffsetMap::default(),
    };
    if inputs.alignment.phase().is_some() && !offsets.is_available() {
        log::debug!(
            "alignment {} has no base arrival; rendering at zero offsets",
            inputs.alignment
        );
    }

    let mut fresh = Vec::with_capacity(ranked.len());
    for rank in &ranked {
        fresh.push(build_station(rank, &offsets, inputs, theme)?);
    }
    log::debug!(
        "built display tree: {} station(s), sort {}, alignment {}",
        fresh.len(),
        inputs.sort,
        inputs.alignment
    );

    Ok(match previous {
        Some(previous) => diff::update_tree(previous, fresh),
        None => fresh.into_iter().map(Arc::new).collect(),
    })
}

/// Signal-detection hypothesis ids associated to the open event's preferred
/// hypothesis for the active stage.
fn associated_hypothesis_ids(inputs: &DisplayInputs) -> Vec<Uuid> {
    find_open_event(&inputs.events, inputs.open_event_id)
        .and_then(|event| event.preferred_hypothesis(&inputs.stage))
        .map(|h| h.associated_detection_hypotheses.clone())
        .unwrap_or_default()
}

fn rank_station<'a>(
    station: &'a Station,
    event_location: Option<&LocationSolution>,
) -> RankedStation<'a> {
    let located = match (event_location, station.location.as_ref()) {
        (Some(event), Some(site)) => Some((
            geo::distance_km(
                event.latitude_deg,
                event.longitude_deg,
                site.latitude_deg,
                site.longitude_deg,
            ),
            geo::azimuth_deg(
                event.latitude_deg,
                event.longitude_deg,
                site.latitude_deg,
                site.longitude_deg,
            ),
        )),
        _ => None,
    };
    RankedStation {
        station,
        distance_km: located.map(|(d, _)| d),
        azimuth_deg: located.map(|(_, a)| a),
    }
}

/// Stable sort; distance ties and missing distances preserve input order,
/// stations without a distance sort last.
fn sort_stations(ranked: &mut [RankedStation], sort: SortOrder) {
    match sort {
        SortOrder::StationNameAsc => {
            ranked.sort_by(|a, b| a.station.name.cmp(&b.station.name));
        }
        SortOrder::StationNameDesc => {
            ranked.sort_by(|a, b| b.station.name.cmp(&a.station.name));
        }
        SortOrder::DistanceAsc => {
            ranked.sort_by(|a, b| match (a.distance_km, b.distance_km) {
                (Some(da), Some(db)) => da.total_cmp(&db),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            });
        }
    }
}

fn build_station(
    rank: &RankedStation,
    offsets: &OffsetMap,
    inputs: &DisplayInputs,
    theme: &DisplayTheme,
) -> Result<DisplayStation, DisplayError> {
    let station = rank.station;
    let offset = offsets.offset_for(&station.name);
    let filter_name = inputs.filter_name(&station.name);
    let visibility = inputs.visibility(&station.name);

    let detections: Vec<&SignalDetection> = inputs
        .signal_detections
        .iter()
        .filter(|d| d.station == station.name && !d.is_deleted())
        .collect();
    let picks = pick_markers(&detections, inputs, theme);

    let default_channel = build_default_channel(
        station,
        &detections,
        &picks,
        offset,
        filter_name,
        inputs,
        theme,
    );

    let detail_channels = if visibility.expanded && !inputs.mode.is_measurement() {
        build_detail_channels(station, &picks, offset, filter_name, inputs, theme)?
    } else {
        Vec::new()
    };

    let has_qc_masks = station_has_masks(
        &station.channels,
        &inputs.qc_segments_by_channel,
        &inputs.processing_masks,
        theme,
        &inputs.mask_visibility,
        &inputs.zoom_interval,
    );

    Ok(DisplayStation {
        id: station.name.clone(),
        default_channel: Arc::new(default_channel),
        detail_channels,
        split_channels: Vec::new(),
        expanded: visibility.expanded,
        has_qc_masks,
        distance_km: rank.distance_km,
        azimuth_deg: rank.azimuth_deg,
    })
}

/// Pick markers for a station's detections, colored by association status.
fn pick_markers(
    detections: &[&SignalDetection],
    inputs: &DisplayInputs,
    theme: &DisplayTheme,
) -> Vec<PickMarker> {
    detections
        .iter()
        .filter_map(|detection| {
            let hypothesis = detection.current_hypothesis()?;
            let arrival = hypothesis.measurements.arrival.as_ref()?;
            if !arrival.time.is_finite() {
                return None;
            }
            let status = association_status(
                hypothesis.id,
                &inputs.events,
                inputs.open_event_id,
                &inputs.stage,
            );
            Some(PickMarker {
                detection_id: detection.id,
                time: arrival.time,
                uncertainty_sec: arrival.uncertainty_sec,
                phase: detection.phase().unwrap_or("-").to_string(),
                status,
                color: theme.pick_color(status),
                waveform: arrival.waveform.clone(),
            })
        })
        .collect()
}

fn association_status(
    hypothesis_id: Uuid,
    events: &[Event],
    open_event_id: Option<Uuid>,
    stage: &str,
) -> AssociationStatus {
    if let Some(open) = find_open_event(events, open_event_id) {
        if open.is_associated(stage, hypothesis_id) {
            return AssociationStatus::OpenEvent;
        }
    }
    for event in events {
        if Some(event.id) == open_event_id {
            continue;
        }
        if event.is_associated(stage, hypothesis_id) {
            return if event.status == EventStatus::Complete {
                AssociationStatus::CompleteEvent
            } else {
                AssociationStatus::OtherEvent
            };
        }
    }
    AssociationStatus::Unassociated
}

/// Predicted-phase markers for the default channel: non-extrapolated
/// predictions of a priority phase or the alignment phase.
fn predicted_markers(
    station: &Station,
    inputs: &DisplayInputs,
    theme: &DisplayTheme,
) -> Vec<PredictedPhaseMarker> {
    let alignment_phase = inputs.alignment.phase();
    inputs
        .predictions
        .iter()
        .filter(|p| p.station == station.name && !p.extrapolated)
        .filter(|p| {
            inputs.config.priority_phases.iter().any(|ph| *ph == p.phase)
                || alignment_phase == Some(p.phase.as_str())
        })
        .map(|p| PredictedPhaseMarker {
            phase: p.phase.clone(),
            time: p.predicted_time,
            color: theme.predicted_phase,
        })
        .collect()
}

fn boundary_markers(inputs: &DisplayInputs, theme: &DisplayTheme) -> Vec<BoundaryMarker> {
    vec![
        BoundaryMarker {
            time: inputs.view_interval.start,
            color: theme.boundary_marker,
        },
        BoundaryMarker {
            time: inputs.view_interval.end,
            color: theme.boundary_marker,
        },
    ]
}

#[allow(clippy::too_many_arguments)]
fn build_default_channel(
    station: &Station,
    detections: &[&SignalDetection],
    picks: &[PickMarker],
    offset: f64,
    filter_name: &str,
    inputs: &DisplayInputs,
    theme: &DisplayTheme,
) -> DisplayChannel {
    let segments_by_filter = inputs
        .segments
        .get(&station.name)
        .cloned()
        .unwrap_or_default();
    let filter_error = segments_by_filter
        .get(filter_name)
        .map_or(false, |record| record.filter_failed);
    if filter_error {
        log::warn!(
            "filter {filter_name:?} failed on {}; showing unfiltered data",
            station.name
        );
    }

    let selection_windows = detections
        .iter()
        .flat_map(|detection| {
            windows_for_detection(
                detection,
                &inputs.events,
                inputs.open_event_id,
                &inputs.stage,
                &inputs.mode,
                &inputs.measurement_overrides,
                &inputs.config,
                theme,
            )
        })
        .collect();

    DisplayChannel {
        id: station.name.clone(),
        kind: ChannelKind::Default,
        label: station.name.clone(),
        time_offset_sec: offset,
        segments_by_filter,
        description: ChannelDescription {
            filter_label: filter_name.to_string(),
            filter_error,
        },
        picks: picks.to_vec(),
        predicted_phases: predicted_markers(station, inputs, theme),
        masks: Vec::new(),
        boundaries: boundary_markers(inputs, theme),
        selection_windows,
        split: None,
    }
}

/// One detail channel per visible raw channel, ordered by group then
/// orientation code. Raw channels keep only the picks measured on them.
fn build_detail_channels(
    station: &Station,
    picks: &[PickMarker],
    offset: f64,
    filter_name: &str,
    inputs: &DisplayInputs,
    theme: &DisplayTheme,
) -> Result<Vec<Arc<DisplayChannel>>, DisplayError> {
    let mut keyed = Vec::new();
    for channel in &station.channels {
        if inputs.hidden_channels.contains(&channel.name) {
            continue;
        }
        let parsed = parse_channel_name(&channel.name)?;
        keyed.push((parsed.sort_key(), parsed.short_label(), channel));
    }
    keyed.sort_by(|a, b| a.0.cmp(&b.0));

    let channels = keyed
        .into_iter()
        .map(|(_, label, channel)| {
            let segments_by_filter = inputs
                .segments
                .get(&channel.name)
                .cloned()
                .unwrap_or_default();
            let filter_error = segments_by_filter
                .get(filter_name)
                .map_or(false, |record| record.filter_failed);

            let processing_mask = inputs
                .processing_masks
                .iter()
                .find(|m| m.applied_to_channel == channel.name);
            let masks = build_masks(
                &channel.name,
                &inputs.qc_segments_by_channel,
                processing_mask,
                theme,
                &inputs.mask_visibility,
            );

            let channel_picks = picks
                .iter()
                .filter(|pick| {
                    pick.waveform
                        .as_ref()
                        .map_or(false, |w| w.channel == channel.name)
                })
                .cloned()
                .collect();

            Arc::new(DisplayChannel {
                id: channel.name.clone(),
                kind: ChannelKind::Detail,
                label,
                time_offset_sec: offset,
                segments_by_filter,
                description: ChannelDescription {
                    filter_label: filter_name.to_string(),
                    filter_error,
                },
                picks: channel_picks,
                predicted_phases: Vec::new(),
                masks,
                boundaries: boundary_markers(inputs, theme),
                selection_windows: Vec::new(),
                split: None,
            })
        })
        .collect();
    Ok(channels)
}
