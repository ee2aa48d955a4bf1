use std::fmt;

use bytemuck::{Pod, Zeroable};
use serde::Serialize;

/// Unique identifier for an atom in a molecule. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct AtomId(pub u32);

/// Unique identifier for a bond in a molecule. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct BondId(pub u32);

impl fmt::Display for AtomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for BondId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An event communicated from the editor to the UI layer.
/// Generic container: `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct EditorEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl EditorEvent {
    pub const FLOATS: usize = 4;

    /// Total atom count after a committed change. `a` = count.
    pub const ATOM_COUNT: f32 = 1.0;
    /// Total bond count after a committed change. `a` = count.
    pub const BOND_COUNT: f32 = 2.0;
    /// A gesture was dropped. `a` = reason code, `b` = atom id involved.
    pub const REJECTED: f32 = 3.0;
    /// Selection changed. `a` = atom id, or -1 when cleared.
    pub const SELECTION: f32 = 4.0;

    pub fn new(kind: f32, a: f32) -> Self {
        Self { kind, a, b: 0.0, c: 0.0 }
    }
}

/// What a pointer click does, chosen by the UI toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Clicks select a single atom; nothing is mutated.
    Select,
    /// Clicks place and grow atoms; drags bond and extend.
    #[default]
    AtomPlacement,
    /// Clicks delete the atom or bond under the pointer.
    Erase,
}

impl Mode {
    /// Decode the numeric mode sent by the UI (0 select, 1 atom, 2 erase).
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::Select),
            1 => Some(Self::AtomPlacement),
            2 => Some(Self::Erase),
            _ => None,
        }
    }
}
