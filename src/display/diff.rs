//! Incremental tree update: reconcile a freshly built station against the
//! previous build so every unchanged piece keeps its previous `Arc`
//! allocation. Comparison is shallow per field; nested nodes are reused or
//! replaced whole, never merged recursively.

use std::sync::Arc;

use crate::display::tree::{DisplayChannel, DisplayStation, DisplayTree};

/// Outcome of reconciling one node against its previous build.
#[derive(Debug)]
enum Reconciled<T> {
    /// Content unchanged; the previous allocation is handed back.
    Kept(Arc<T>),
    /// Content differs; the fresh node replaces the old one whole.
    Replaced(Arc<T>),
}

impl<T> Reconciled<T> {
    fn is_replaced(&self) -> bool {
        matches!(self, Reconciled::Replaced(_))
    }

    fn into_arc(self) -> Arc<T> {
        match self {
            Reconciled::Kept(arc) | Reconciled::Replaced(arc) => arc,
        }
    }
}

fn reconcile<T: PartialEq>(previous: Option<&Arc<T>>, fresh: Arc<T>) -> Reconciled<T> {
    match previous {
        Some(prev) if **prev == *fresh => Reconciled::Kept(Arc::clone(prev)),
        _ => Reconciled::Replaced(fresh),
    }
}

/// Reconcile a channel list by id. Channels that left the list are dropped,
/// new or changed ones are replaced, unchanged ones keep their allocation.
/// A change in length or ordering marks the list changed even when every
/// surviving channel was kept.
fn reconcile_channels(
    previous: &[Arc<DisplayChannel>],
    fresh: Vec<Arc<DisplayChannel>>,
    changed: &mut bool,
) -> Vec<Arc<DisplayChannel>> {
    if previous.len() != fresh.len()
        || previous
            .iter()
            .zip(fresh.iter())
            .any(|(prev, new)| prev.id != new.id)
    {
        *changed = true;
    }
    fresh
        .into_iter()
        .map(|channel| {
            let prev = previous.iter().find(|p| p.id == channel.id);
            let reconciled = reconcile(prev, channel);
            if reconciled.is_replaced() {
                *changed = true;
            }
            reconciled.into_arc()
        })
        .collect()
}

/// Reconcile one freshly built station against its previous build. Returns
/// the previous allocation when nothing changed at all.
pub fn update_station(
    previous: &Arc<DisplayStation>,
    fresh: DisplayStation,
) -> Arc<DisplayStation> {
    let mut changed = previous.id != fresh.id
        || previous.expanded != fresh.expanded
        || previous.has_qc_masks != fresh.has_qc_masks
        || previous.distance_km != fresh.distance_km
        || previous.azimuth_deg != fresh.azimuth_deg;

    let default_channel = {
        let reconciled = reconcile(Some(&previous.default_channel), fresh.default_channel);
        if reconciled.is_replaced() {
            changed = true;
        }
        reconciled.into_arc()
    };
    let detail_channels =
        reconcile_channels(&previous.detail_channels, fresh.detail_channels, &mut changed);
    let split_channels =
        reconcile_channels(&previous.split_channels, fresh.split_channels, &mut changed);

    if !changed {
        return Arc::clone(previous);
    }
    Arc::new(DisplayStation {
        id: fresh.id,
        default_channel,
        detail_channels,
        split_channels,
        expanded: fresh.expanded,
        has_qc_masks: fresh.has_qc_masks,
        distance_km: fresh.distance_km,
        azimuth_deg: fresh.azimuth_deg,
    })
}

/// Reconcile a whole fresh tree against the previous one by station id.
pub fn update_tree(previous: &[Arc<DisplayStation>], fresh: Vec<DisplayStation>) -> DisplayTree {
    fresh
        .into_iter()
        .map(
            |station| match previous.iter().find(|p| p.id == station.id) {
                Some(prev) => update_station(prev, station),
                None => Arc::new(station),
            },
        )
        .collect()
}
