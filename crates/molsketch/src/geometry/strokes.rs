//! Line segments for drawing single, double and triple bonds.
//!
//! Output is plain geometry for the drawing layer: one `BondStroke` per line
//! to paint. Secondary strokes are offset along the bond's perpendicular.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use serde::Serialize;

use crate::core::molecule::{Bond, BondOrder, Molecule};

/// Default perpendicular distance between parallel strokes.
pub const DEFAULT_STROKE_OFFSET: f32 = 5.0;

/// Fraction of the bond length trimmed from each end of an inner stroke.
const INNER_TRIM: f32 = 0.15;

/// Projections smaller than this count as "no preferred side".
const SIDE_EPS: f32 = 1e-4;

/// A line segment to paint. Wire format: x0, y0, x1, y1.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize)]
pub struct BondStroke {
    pub start: Vec2,
    pub end: Vec2,
}

impl BondStroke {
    pub const FLOATS: usize = 4;

    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    fn shifted(self, by: Vec2) -> Self {
        Self::new(self.start + by, self.end + by)
    }
}

/// Strokes for one bond from `a` to `b`.
///
/// `neighbors` are directions (from whichever endpoint they attach to) of
/// the other bonds touching either endpoint. They only matter for double
/// bonds, whose second stroke goes on the side most neighbors lie on; with
/// no such side the pair is centered on the axis.
pub fn bond_strokes(
    a: Vec2,
    b: Vec2,
    order: BondOrder,
    neighbors: &[Vec2],
    offset: f32,
) -> Vec<BondStroke> {
    let axis = BondStroke::new(a, b);
    let Some(dir) = (b - a).try_normalize() else {
        return vec![axis];
    };
    let perp = dir.perp();

    match order {
        BondOrder::Single => vec![axis],
        BondOrder::Double => {
            let side: f32 = neighbors
                .iter()
                .map(|n| n.normalize_or_zero().dot(perp))
                .sum();
            if side.abs() < SIDE_EPS {
                let half = perp * (offset / 2.0);
                vec![axis.shifted(half), axis.shifted(-half)]
            } else {
                let trim = dir * ((b - a).length() * INNER_TRIM);
                let shift = perp * (offset * side.signum());
                let inner = BondStroke::new(a + shift + trim, b + shift - trim);
                vec![axis, inner]
            }
        }
        BondOrder::Triple => {
            let shift = perp * offset;
            vec![axis, axis.shifted(shift), axis.shifted(-shift)]
        }
    }
}

/// Directions of the other bonds at both ends of `bond`.
pub fn neighbor_directions(bond: &Bond, molecule: &Molecule) -> Vec<Vec2> {
    let skip = bond.id;
    [bond.begin, bond.end]
        .into_iter()
        .flat_map(move |end| {
            molecule
                .bonds_of(end)
                .filter(move |other| other.id != skip)
                .filter_map(move |other| molecule.bond_direction(other, end))
        })
        .collect()
}

/// Strokes for every bond in the molecule, in bond creation order.
pub fn molecule_strokes(molecule: &Molecule, offset: f32) -> Vec<BondStroke> {
    let mut out = Vec::with_capacity(molecule.bond_count() * 2);
    for bond in molecule.bonds() {
        let (Some(a), Some(b)) = (molecule.atom(bond.begin), molecule.atom(bond.end)) else {
            continue;
        };
        let neighbors = neighbor_directions(bond, molecule);
        out.extend(bond_strokes(a.position, b.position, bond.order, &neighbors, offset));
    }
    out
}
