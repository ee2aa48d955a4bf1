//! Click vs. drag disambiguation for pointer gestures that start on an atom.
//!
//! The machine only decides; it never touches the molecule. The editor
//! turns each `GestureOutcome` into a valence-checked mutation.

use glam::Vec2;

use crate::api::types::AtomId;

/// Default movement (canvas units) separating a click from a drag.
pub const DEFAULT_DRAG_THRESHOLD: f32 = 5.0;

/// Where a gesture currently stands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureState {
    /// No pointer session.
    Idle,
    /// Pointer went down on `origin` and has not moved past the threshold.
    PendingClick { origin: AtomId, down: Vec2 },
    /// Pointer went down on `origin` and moved past the threshold at least
    /// once. Moving back inside the threshold does not revert to a click.
    Dragging {
        origin: AtomId,
        down: Vec2,
        current: Vec2,
    },
}

/// What a finished gesture asks the editor to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureOutcome {
    /// No mutation.
    None,
    /// Click on an atom: grow a new atom from it.
    Grow { origin: AtomId },
    /// Drag released over another atom: bond the two.
    Connect { from: AtomId, to: AtomId },
    /// Drag released over empty canvas: new atom toward the release point.
    Extend { origin: AtomId, toward: Vec2 },
}

/// Pointer gesture state machine.
#[derive(Debug, Clone)]
pub struct GestureMachine {
    state: GestureState,
    drag_threshold: f32,
}

impl GestureMachine {
    pub fn new(drag_threshold: f32) -> Self {
        Self {
            state: GestureState::Idle,
            drag_threshold,
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    /// Whether a pointer session is open.
    pub fn is_active(&self) -> bool {
        !matches!(self.state, GestureState::Idle)
    }

    /// Origin atom and current pointer while dragging, for the preview line.
    pub fn preview(&self) -> Option<(AtomId, Vec2)> {
        match self.state {
            GestureState::Dragging { origin, current, .. } => Some((origin, current)),
            _ => None,
        }
    }

    /// Pointer went down on an atom. Any open session is replaced.
    pub fn on_pointer_down_on_atom(&mut self, atom: AtomId, pos: Vec2) {
        self.state = GestureState::PendingClick { origin: atom, down: pos };
    }

    /// Pointer moved. Only updates session state.
    pub fn on_pointer_move(&mut self, pos: Vec2) {
        self.state = match self.state {
            GestureState::Idle => GestureState::Idle,
            GestureState::PendingClick { origin, down } => {
                if self.beyond_threshold(down, pos) {
                    GestureState::Dragging { origin, down, current: pos }
                } else {
                    GestureState::PendingClick { origin, down }
                }
            }
            GestureState::Dragging { origin, down, .. } => {
                GestureState::Dragging { origin, down, current: pos }
            }
        };
    }

    /// Pointer released at `pos`, over `atom_under` if any.
    /// The session always ends here.
    pub fn on_pointer_up(&mut self, pos: Vec2, atom_under: Option<AtomId>) -> GestureOutcome {
        let state = std::mem::replace(&mut self.state, GestureState::Idle);

        let (origin, dragged) = match state {
            GestureState::Idle => return GestureOutcome::None,
            // A release far from the press counts as a drag even if no move
            // event arrived in between.
            GestureState::PendingClick { origin, down } => {
                (origin, self.beyond_threshold(down, pos))
            }
            GestureState::Dragging { origin, .. } => (origin, true),
        };

        if !dragged {
            return GestureOutcome::Grow { origin };
        }
        match atom_under {
            Some(to) if to != origin => GestureOutcome::Connect { from: origin, to },
            Some(_) => GestureOutcome::None,
            None => GestureOutcome::Extend { origin, toward: pos },
        }
    }

    /// Drop any open session without an outcome.
    pub fn cancel(&mut self) {
        self.state = GestureState::Idle;
    }

    fn beyond_threshold(&self, down: Vec2, pos: Vec2) -> bool {
        down.distance(pos) > self.drag_threshold
    }
}

impl Default for GestureMachine {
    fn default() -> Self {
        Self::new(DEFAULT_DRAG_THRESHOLD)
    }
}
