pub mod api;
pub mod chem;
pub mod core;
pub mod geometry;
pub mod input;

// Re-export key types at crate root for convenience
pub use api::editor::{Edit, EditResult, Editor, EditorConfig};
pub use api::types::{AtomId, BondId, EditorEvent, Mode};
pub use chem::elements::{canonical_symbol, COMMON_ELEMENTS, DEFAULT_MAX_VALENCE, ELEMENTS};
pub use chem::valence::{can_accept, current_valence, free_valence, max_valence};
pub use core::error::Rejection;
pub use core::molecule::{Atom, Bond, BondOrder, Molecule};
pub use geometry::growth::{next_growth_angle, GrowthPolicy, DEFAULT_BOND_LENGTH};
pub use geometry::strokes::{bond_strokes, molecule_strokes, BondStroke};
pub use input::gesture::{GestureMachine, GestureOutcome, GestureState};
pub use input::hit_test::{atom_at, bond_at};
pub use input::queue::{InputEvent, InputQueue};
