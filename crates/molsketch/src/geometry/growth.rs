//! Placement of newly grown atoms.
//!
//! Angles are radians in canvas space (x right, y down), normalized to
//! (-π, π]. The chosen direction depends only on the existing bond
//! directions, so identical configurations always give identical results.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::types::AtomId;
use crate::core::molecule::Molecule;

/// Fixed length of grown and extended bonds.
pub const DEFAULT_BOND_LENGTH: f32 = 40.0;

/// Angular tolerance when comparing gaps and candidates.
const ANGLE_EPS: f32 = 1e-5;

/// How to place a second substituent on an atom with exactly one bond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthPolicy {
    /// Straight across from the existing bond (180°).
    #[default]
    Straight,
    /// ±120° from the existing bond, whichever moves further vertically.
    ZigZag,
}

/// Wrap an angle into (-π, π].
pub fn normalize_angle(angle: f32) -> f32 {
    let a = angle.rem_euclid(TAU);
    if a > PI {
        a - TAU
    } else {
        a
    }
}

/// Angle of a direction vector.
pub fn angle_of(dir: Vec2) -> f32 {
    dir.y.atan2(dir.x)
}

/// Directions of every bond on `atom`, as angles. Bonds whose far atom sits
/// exactly on top of `atom` have no direction and are skipped.
pub fn bond_angles(atom: AtomId, molecule: &Molecule) -> Vec<f32> {
    molecule
        .bonds_of(atom)
        .filter_map(|b| molecule.bond_direction(b, atom))
        .map(angle_of)
        .collect()
}

/// Whether `candidate` wins a tie against `current`: smaller absolute angle,
/// then the non-negative one.
fn preferred(candidate: f32, current: f32) -> bool {
    let (ca, cu) = (candidate.abs(), current.abs());
    if ca < cu - ANGLE_EPS {
        return true;
    }
    (ca - cu).abs() <= ANGLE_EPS && candidate >= 0.0 && current < 0.0
}

/// Bisector of the widest angular gap between existing directions. This is
/// the direction maximizing the minimum angular distance to all of them.
pub fn largest_gap_angle(existing: &[f32]) -> f32 {
    if existing.is_empty() {
        return 0.0;
    }

    let mut sorted: Vec<f32> = existing.iter().map(|a| a.rem_euclid(TAU)).collect();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len();
    let mut best_gap = f32::NEG_INFINITY;
    let mut best_angle = 0.0;
    for i in 0..n {
        let start = sorted[i];
        let end = if i + 1 < n { sorted[i + 1] } else { sorted[0] + TAU };
        let gap = end - start;
        let candidate = normalize_angle(start + gap / 2.0);

        let wider = gap > best_gap + ANGLE_EPS;
        let tied = (gap - best_gap).abs() <= ANGLE_EPS;
        if wider || (tied && preferred(candidate, best_angle)) {
            best_gap = gap;
            best_angle = candidate;
        }
    }
    best_angle
}

/// ±120° from a single bond, picking the larger vertical displacement.
fn zig_zag_angle(existing: f32) -> f32 {
    let third = TAU / 3.0;
    let up = normalize_angle(existing + third);
    let down = normalize_angle(existing - third);
    let (dy_up, dy_down) = (up.sin().abs(), down.sin().abs());
    if dy_up > dy_down + ANGLE_EPS {
        up
    } else if dy_down > dy_up + ANGLE_EPS {
        down
    } else if preferred(down, up) {
        down
    } else {
        up
    }
}

/// Angle at which to grow a new atom given the existing bond directions.
pub fn next_growth_angle(existing: &[f32], policy: GrowthPolicy) -> f32 {
    match (existing, policy) {
        ([], _) => 0.0,
        ([single], GrowthPolicy::ZigZag) => zig_zag_angle(*single),
        _ => largest_gap_angle(existing),
    }
}

/// Point at `length` from `origin` in direction `angle`.
pub fn place_at_angle(origin: Vec2, angle: f32, length: f32) -> Vec2 {
    origin + Vec2::from_angle(angle) * length
}

/// Where a new atom grown from `atom` goes. `None` if the atom is missing.
pub fn growth_position(
    atom: AtomId,
    molecule: &Molecule,
    policy: GrowthPolicy,
    length: f32,
) -> Option<Vec2> {
    let origin = molecule.atom(atom)?.position;
    let angle = next_growth_angle(&bond_angles(atom, molecule), policy);
    Some(place_at_angle(origin, angle, length))
}

/// Point at `length` from `origin` toward `target`. `None` when the two
/// points coincide and there is no direction.
pub fn extension_position(origin: Vec2, target: Vec2, length: f32) -> Option<Vec2> {
    (target - origin)
        .try_normalize()
        .map(|dir| origin + dir * length)
}
