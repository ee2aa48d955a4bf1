//! Valence oracle: bond-order sums and element limits.
//!
//! Pure functions over a `Molecule`; every mutation that adds a bond to an
//! existing atom goes through `can_accept` first.

use crate::api::types::AtomId;
use crate::chem::elements::{lookup, DEFAULT_MAX_VALENCE};
use crate::core::error::Rejection;
use crate::core::molecule::{BondOrder, Molecule};

/// Sum of bond orders over all bonds touching the atom. 0 if none.
pub fn current_valence(atom: AtomId, molecule: &Molecule) -> u32 {
    molecule
        .bonds_of(atom)
        .map(|b| b.order.value() as u32)
        .sum()
}

/// Maximum bond-order sum for an element. Unknown symbols get 4.
pub fn max_valence(element: &str) -> u32 {
    lookup(element).map_or(DEFAULT_MAX_VALENCE, |(_, max)| max) as u32
}

/// Whether the atom can take `additional` more bond order.
/// Missing atoms accept nothing.
pub fn can_accept(atom: AtomId, molecule: &Molecule, additional: BondOrder) -> bool {
    match molecule.atom(atom) {
        Some(a) => {
            current_valence(atom, molecule) + additional.value() as u32 <= max_valence(&a.element)
        }
        None => false,
    }
}

/// Remaining bond-order capacity of an atom (0 when saturated or missing).
pub fn free_valence(atom: AtomId, molecule: &Molecule) -> u32 {
    molecule.atom(atom).map_or(0, |a| {
        max_valence(&a.element).saturating_sub(current_valence(atom, molecule))
    })
}

/// Check every listed endpoint, reporting the first one that cannot take
/// the extra order.
pub fn check_endpoints(
    atoms: &[AtomId],
    molecule: &Molecule,
    additional: BondOrder,
) -> Result<(), Rejection> {
    for &atom in atoms {
        if !molecule.contains_atom(atom) {
            return Err(Rejection::DanglingReference { atom });
        }
        if !can_accept(atom, molecule, additional) {
            return Err(Rejection::ValenceExceeded { atom });
        }
    }
    Ok(())
}
