//! Reasons a mutation was dropped.
//!
//! None of these are user-facing errors: the editor logs them and leaves the
//! molecule untouched.

use thiserror::Error;

use crate::api::types::AtomId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    /// A proposed bond would push the atom's bond-order sum above its maximum.
    #[error("atom {atom} would exceed its maximum valence")]
    ValenceExceeded { atom: AtomId },

    /// The two endpoints already share a bond.
    #[error("atoms {begin} and {end} are already bonded")]
    DuplicateBond { begin: AtomId, end: AtomId },

    /// The mutation referenced an atom that no longer exists.
    #[error("atom {atom} does not exist")]
    DanglingReference { atom: AtomId },

    /// A bond from an atom to itself.
    #[error("atom {atom} cannot bond to itself")]
    SelfBond { atom: AtomId },
}

impl Rejection {
    /// Numeric reason code carried in `EditorEvent::REJECTED` events.
    pub fn code(&self) -> u32 {
        match self {
            Self::ValenceExceeded { .. } => 1,
            Self::DuplicateBond { .. } => 2,
            Self::DanglingReference { .. } => 3,
            Self::SelfBond { .. } => 4,
        }
    }

    /// The atom the rejection is about.
    pub fn atom(&self) -> AtomId {
        match self {
            Self::ValenceExceeded { atom }
            | Self::DanglingReference { atom }
            | Self::SelfBond { atom } => *atom,
            Self::DuplicateBond { begin, .. } => *begin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct() {
        let a = AtomId(1);
        let codes = [
            Rejection::ValenceExceeded { atom: a }.code(),
            Rejection::DuplicateBond { begin: a, end: AtomId(2) }.code(),
            Rejection::DanglingReference { atom: a }.code(),
            Rejection::SelfBond { atom: a }.code(),
        ];
        for i in 0..codes.len() {
            for j in i + 1..codes.len() {
                assert_ne!(codes[i], codes[j]);
            }
        }
    }

    #[test]
    fn display_mentions_atoms() {
        let r = Rejection::DuplicateBond { begin: AtomId(3), end: AtomId(7) };
        assert_eq!(r.to_string(), "atoms 3 and 7 are already bonded");
    }
}
