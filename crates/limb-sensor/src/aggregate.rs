//! Merging per-facet crossings into one cyclic sequence around the horizon.

use std::cmp::Ordering;

use tracing::debug;

use crate::crossing::{Crossing, CrossingKind};
use crate::error::HorizonError;
use crate::horizon::HorizonFrame;

/// Deduplicate, sort and resolve the kinds of all crossings of one update.
///
/// An odd number of crossings after deduplication means the limb grazes a
/// corner or runs along a facet; that frame yields no crossings at all.
pub fn aggregate_crossings(
    frame: &HorizonFrame,
    crossings: Vec<Crossing>,
) -> Result<Vec<Crossing>, HorizonError> {
    let raw_count = crossings.len();
    let mut crossings = deduplicate(crossings);

    if crossings.len() % 2 != 0 {
        debug!(
            raw_count,
            unique = crossings.len(),
            "Odd horizon crossing count, dropping degenerate frame"
        );
        return Ok(Vec::new());
    }

    if let Some(undefined) = crossings.iter().find(|c| !c.has_angle()) {
        return Err(HorizonError::UndefinedCrossingAngle {
            facet_index: undefined.facet_index,
        });
    }

    crossings.sort_by(compare_angular_position);
    resolve_kinds(frame, &mut crossings);
    Ok(crossings)
}

/// Keep the first of every group of crossings pointing the same way.
pub fn deduplicate(crossings: Vec<Crossing>) -> Vec<Crossing> {
    let mut unique: Vec<Crossing> = Vec::with_capacity(crossings.len());
    for crossing in crossings {
        if !unique.iter().any(|u| u.is_duplicate_of(&crossing)) {
            unique.push(crossing);
        }
    }
    unique
}

/// Counter-clockwise order starting at angle zero, without `atan2`.
///
/// The upper half circle `[0, π)` sorts before the lower `[π, 2π)`. Inside
/// the upper half the cosine falls as the angle grows; inside the lower half
/// it rises.
pub fn compare_angular_position(a: &Crossing, b: &Crossing) -> Ordering {
    let upper = |c: &Crossing| c.angle_sine > 0.0 || (c.angle_sine == 0.0 && c.angle_cosine > 0.0);
    match (upper(a), upper(b)) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (true, true) => b.angle_cosine.total_cmp(&a.angle_cosine),
        (false, false) => a.angle_cosine.total_cmp(&b.angle_cosine),
    }
}

/// Assign alternating kinds to a sorted sequence.
///
/// The first crossing is `On` when its facet's outward normal points along
/// the clockwise tangent: walking counter-clockwise the limb then moves to
/// the inner side of the facet.
pub fn resolve_kinds(frame: &HorizonFrame, crossings: &mut [Crossing]) {
    let Some(first) = crossings.first() else {
        return;
    };
    let clockwise = -frame.ccw_tangent(first.direction_scaled);
    let mut kind = if first.surface_normal.dot(clockwise) > 0.0 {
        CrossingKind::On
    } else {
        CrossingKind::Off
    };
    for crossing in crossings.iter_mut() {
        crossing.kind = kind;
        kind = kind.opposite();
    }
}

/// Returns true if consecutive kinds differ, cyclically, and none is
/// undetermined.
pub fn kinds_alternate(crossings: &[Crossing]) -> bool {
    if crossings.len() % 2 != 0 {
        return false;
    }
    crossings
        .iter()
        .zip(crossings.iter().cycle().skip(1))
        .all(|(a, b)| a.kind != CrossingKind::Undetermined && a.kind == b.kind.opposite())
}
