//! Molecule store: the atom/bond graph and its invariant-preserving mutators.
//!
//! Flat `Vec` storage in creation order, like the engine's entity scene.
//! Sized for hand-drawn structures (tens to hundreds of atoms), so lookups
//! are linear scans.

use glam::Vec2;
use serde::Serialize;

use crate::api::types::{AtomId, BondId};
use crate::chem::elements::canonical_symbol;
use crate::core::error::Rejection;

/// Bond multiplicity. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
#[serde(into = "u8")]
pub enum BondOrder {
    #[default]
    Single = 1,
    Double = 2,
    Triple = 3,
}

impl BondOrder {
    pub fn from_u8(order: u8) -> Option<Self> {
        match order {
            1 => Some(Self::Single),
            2 => Some(Self::Double),
            3 => Some(Self::Triple),
            _ => None,
        }
    }

    /// Contribution of this bond to each endpoint's valence.
    pub fn value(self) -> u8 {
        self as u8
    }
}

impl From<BondOrder> for u8 {
    fn from(order: BondOrder) -> u8 {
        order.value()
    }
}

impl TryFrom<u8> for BondOrder {
    type Error = u8;

    fn try_from(order: u8) -> Result<Self, Self::Error> {
        Self::from_u8(order).ok_or(order)
    }
}

/// An atom on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Atom {
    pub id: AtomId,
    /// Canvas position (y grows downward).
    pub position: Vec2,
    /// Canonical element symbol, e.g. "Cl".
    pub element: String,
}

/// A bond between two distinct atoms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bond {
    pub id: BondId,
    pub begin: AtomId,
    pub end: AtomId,
    pub order: BondOrder,
}

impl Bond {
    /// Check if this bond connects the given atoms (order-independent).
    pub fn connects(&self, a: AtomId, b: AtomId) -> bool {
        (self.begin == a && self.end == b) || (self.begin == b && self.end == a)
    }

    /// Whether the atom is one of this bond's endpoints.
    pub fn touches(&self, atom: AtomId) -> bool {
        self.begin == atom || self.end == atom
    }

    /// The endpoint opposite `atom`, if `atom` is an endpoint.
    pub fn other(&self, atom: AtomId) -> Option<AtomId> {
        if self.begin == atom {
            Some(self.end)
        } else if self.end == atom {
            Some(self.begin)
        } else {
            None
        }
    }
}

/// The atom/bond graph.
///
/// Invariants held after every public call:
/// - every bond's endpoints are atoms of this molecule,
/// - no bond joins an atom to itself,
/// - at most one bond joins any unordered pair of atoms.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Molecule {
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    #[serde(skip)]
    next_atom_id: u32,
    #[serde(skip)]
    next_bond_id: u32,
}

impl Molecule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new atom. Always succeeds.
    pub fn add_atom(&mut self, position: Vec2, element: &str) -> AtomId {
        debug_assert!(position.is_finite(), "atom position must be finite");
        let id = AtomId(self.next_atom_id);
        self.next_atom_id += 1;
        self.atoms.push(Atom {
            id,
            position,
            element: canonical_symbol(element),
        });
        id
    }

    /// Add a bond between two existing, distinct, not-yet-bonded atoms.
    /// Valence is not checked here; see `chem::valence`.
    pub fn add_bond(
        &mut self,
        begin: AtomId,
        end: AtomId,
        order: BondOrder,
    ) -> Result<BondId, Rejection> {
        for atom in [begin, end] {
            if !self.contains_atom(atom) {
                return Err(Rejection::DanglingReference { atom });
            }
        }
        if begin == end {
            return Err(Rejection::SelfBond { atom: begin });
        }
        if self.bond_between(begin, end).is_some() {
            return Err(Rejection::DuplicateBond { begin, end });
        }

        let id = BondId(self.next_bond_id);
        self.next_bond_id += 1;
        self.bonds.push(Bond { id, begin, end, order });
        Ok(id)
    }

    /// Remove an atom and every bond touching it. Returns the removed atom.
    pub fn remove_atom(&mut self, id: AtomId) -> Option<Atom> {
        let idx = self.atoms.iter().position(|a| a.id == id)?;
        self.bonds.retain(|b| !b.touches(id));
        Some(self.atoms.remove(idx))
    }

    /// Remove a bond. Returns the removed bond.
    pub fn remove_bond(&mut self, id: BondId) -> Option<Bond> {
        let idx = self.bonds.iter().position(|b| b.id == id)?;
        Some(self.bonds.remove(idx))
    }

    /// Remove every atom and bond. Ids keep counting up.
    pub fn clear(&mut self) {
        self.atoms.clear();
        self.bonds.clear();
    }

    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.iter().find(|a| a.id == id)
    }

    pub fn bond(&self, id: BondId) -> Option<&Bond> {
        self.bonds.iter().find(|b| b.id == id)
    }

    pub fn contains_atom(&self, id: AtomId) -> bool {
        self.atom(id).is_some()
    }

    /// Atoms in creation order.
    pub fn atoms(&self) -> impl Iterator<Item = &Atom> {
        self.atoms.iter()
    }

    /// Bonds in creation order.
    pub fn bonds(&self) -> impl Iterator<Item = &Bond> {
        self.bonds.iter()
    }

    /// The bond joining `a` and `b`, in either direction.
    pub fn bond_between(&self, a: AtomId, b: AtomId) -> Option<&Bond> {
        self.bonds.iter().find(|bond| bond.connects(a, b))
    }

    /// Bonds touching an atom.
    pub fn bonds_of(&self, atom: AtomId) -> impl Iterator<Item = &Bond> {
        self.bonds.iter().filter(move |b| b.touches(atom))
    }

    /// Atoms bonded to `atom`.
    pub fn neighbors(&self, atom: AtomId) -> impl Iterator<Item = AtomId> + '_ {
        self.bonds_of(atom).filter_map(move |b| b.other(atom))
    }

    /// Unit vector from `from` along the bond toward its other endpoint.
    /// `None` if `from` is not an endpoint or both atoms coincide.
    pub fn bond_direction(&self, bond: &Bond, from: AtomId) -> Option<Vec2> {
        let to = bond.other(from)?;
        let a = self.atom(from)?.position;
        let b = self.atom(to)?.position;
        (b - a).try_normalize()
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> (Molecule, AtomId, AtomId) {
        let mut mol = Molecule::new();
        let a = mol.add_atom(Vec2::new(0.0, 0.0), "C");
        let b = mol.add_atom(Vec2::new(40.0, 0.0), "C");
        (mol, a, b)
    }

    #[test]
    fn add_atom_canonicalizes_element() {
        let mut mol = Molecule::new();
        let id = mol.add_atom(Vec2::ZERO, "cl");
        assert_eq!(mol.atom(id).unwrap().element, "Cl");
    }

    #[test]
    fn ids_are_unique_and_not_reused() {
        let mut mol = Molecule::new();
        let a = mol.add_atom(Vec2::ZERO, "C");
        mol.remove_atom(a);
        let b = mol.add_atom(Vec2::ZERO, "C");
        assert_ne!(a, b);
    }

    #[test]
    fn add_bond_between_existing_atoms() {
        let (mut mol, a, b) = pair();
        let bond = mol.add_bond(a, b, BondOrder::Double).unwrap();
        let stored = mol.bond(bond).unwrap();
        assert_eq!(stored.order, BondOrder::Double);
        assert!(stored.connects(b, a));
        assert_eq!(mol.bond_count(), 1);
    }

    #[test]
    fn duplicate_bond_rejected_in_either_direction() {
        let (mut mol, a, b) = pair();
        mol.add_bond(a, b, BondOrder::Single).unwrap();
        assert_eq!(
            mol.add_bond(b, a, BondOrder::Single),
            Err(Rejection::DuplicateBond { begin: b, end: a })
        );
        assert_eq!(mol.bond_count(), 1);
    }

    #[test]
    fn self_bond_rejected() {
        let (mut mol, a, _) = pair();
        assert_eq!(
            mol.add_bond(a, a, BondOrder::Single),
            Err(Rejection::SelfBond { atom: a })
        );
        assert_eq!(mol.bond_count(), 0);
    }

    #[test]
    fn bond_to_missing_atom_rejected() {
        let (mut mol, a, _) = pair();
        let ghost = AtomId(99);
        assert_eq!(
            mol.add_bond(a, ghost, BondOrder::Single),
            Err(Rejection::DanglingReference { atom: ghost })
        );
    }

    #[test]
    fn remove_atom_cascades_to_bonds() {
        let (mut mol, a, b) = pair();
        let c = mol.add_atom(Vec2::new(0.0, 40.0), "O");
        mol.add_bond(a, b, BondOrder::Single).unwrap();
        mol.add_bond(a, c, BondOrder::Single).unwrap();
        let bc = mol.add_bond(b, c, BondOrder::Single).unwrap();

        assert!(mol.remove_atom(a).is_some());
        assert_eq!(mol.atom_count(), 2);
        assert!(mol.bonds().all(|bond| !bond.touches(a)));
        assert_eq!(mol.bonds().map(|bond| bond.id).collect::<Vec<_>>(), vec![bc]);
    }

    #[test]
    fn removing_absent_ids_is_noop() {
        let (mut mol, a, b) = pair();
        let bond = mol.add_bond(a, b, BondOrder::Single).unwrap();
        assert!(mol.remove_atom(AtomId(42)).is_none());
        assert!(mol.remove_bond(BondId(42)).is_none());
        assert!(mol.remove_bond(bond).is_some());
        assert!(mol.remove_bond(bond).is_none());
        assert_eq!(mol.atom_count(), 2);
    }

    #[test]
    fn neighbors_and_direction() {
        let (mut mol, a, b) = pair();
        let bond = mol.add_bond(a, b, BondOrder::Single).unwrap();
        assert_eq!(mol.neighbors(a).collect::<Vec<_>>(), vec![b]);
        let bond = *mol.bond(bond).unwrap();
        let dir = mol.bond_direction(&bond, b).unwrap();
        assert!((dir - Vec2::new(-1.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn atoms_iterate_in_creation_order_after_removal() {
        let mut mol = Molecule::new();
        let ids: Vec<_> = (0..4)
            .map(|i| mol.add_atom(Vec2::new(i as f32, 0.0), "C"))
            .collect();
        mol.remove_atom(ids[1]);
        let left: Vec<_> = mol.atoms().map(|a| a.id).collect();
        assert_eq!(left, vec![ids[0], ids[2], ids[3]]);
    }

    #[test]
    fn bond_order_conversions() {
        assert_eq!(BondOrder::try_from(2), Ok(BondOrder::Double));
        assert_eq!(BondOrder::try_from(0), Err(0));
        assert_eq!(BondOrder::from_u8(4), None);
        assert_eq!(u8::from(BondOrder::Triple), 3);
    }

    #[test]
    fn snapshot_serializes_orders_as_numbers() {
        let (mut mol, a, b) = pair();
        mol.add_bond(a, b, BondOrder::Triple).unwrap();
        let json = serde_json::to_value(&mol).unwrap();
        assert_eq!(json["bonds"][0]["order"], 3);
        assert_eq!(json["atoms"][1]["element"], "C");
        assert!(json.get("next_atom_id").is_none());
    }
}
