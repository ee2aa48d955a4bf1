use crate::api::types::{AtomId, Mode};

/// Input events the editor understands.
/// Positions are canvas coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed; the editor hit-tests for an atom itself.
    PointerDown { x: f32, y: f32 },
    /// Pointer pressed on an atom the UI already identified.
    PointerDownOnAtom { atom: AtomId, x: f32, y: f32 },
    /// Pointer pressed where the UI found no atom.
    PointerDownOnEmpty { x: f32, y: f32 },
    /// Pointer moved.
    PointerMove { x: f32, y: f32 },
    /// Pointer released.
    PointerUp { x: f32, y: f32 },
    /// Toolbar mode changed.
    SetMode(Mode),
    /// Element picked for new atoms.
    SetElement(String),
    /// Bond order picked for new bonds (1, 2 or 3).
    SetBondOrder(u8),
    /// Remove everything.
    Clear,
}

/// A queue of input events.
/// The UI pushes events as they arrive; the editor drains them in order.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    /// Push a new input event.
    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Iterate over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    /// Check if there are pending events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
