//! The editor: owns the molecule and the pointer gesture, and turns UI
//! events into valence-checked mutations.
//!
//! Every mutation is all-or-nothing. A rejected gesture leaves the molecule
//! exactly as it was; the rejection is logged and reported as an
//! `EditorEvent`, never raised to the user.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::types::{AtomId, BondId, EditorEvent, Mode};
use crate::chem::elements;
use crate::chem::valence::{check_endpoints, max_valence};
use crate::core::error::Rejection;
use crate::core::molecule::{BondOrder, Molecule};
use crate::geometry::growth::{
    extension_position, growth_position, GrowthPolicy, DEFAULT_BOND_LENGTH,
};
use crate::geometry::strokes::{molecule_strokes, BondStroke, DEFAULT_STROKE_OFFSET};
use crate::input::gesture::{GestureMachine, GestureOutcome, GestureState, DEFAULT_DRAG_THRESHOLD};
use crate::input::hit_test::{atom_at, bond_at, DEFAULT_ATOM_RADIUS, DEFAULT_BOND_RADIUS};
use crate::input::queue::{InputEvent, InputQueue};

/// Editor configuration. Every field has a default, so a partial JSON
/// object is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Length of grown and extended bonds (default: 40).
    pub bond_length: f32,
    /// Pointer distance that hits an atom (default: 15).
    pub atom_capture_radius: f32,
    /// Pointer distance that hits a bond segment (default: 8).
    pub bond_capture_radius: f32,
    /// Movement separating a click from a drag (default: 5).
    pub drag_threshold: f32,
    /// Spacing of parallel strokes in double/triple bonds (default: 5).
    pub stroke_offset: f32,
    /// Placement of the second substituent on a one-bond atom.
    pub growth_policy: GrowthPolicy,
    /// Element selected at startup (default: "C").
    pub element: String,
    /// Bond order selected at startup (default: 1).
    pub bond_order: u8,
    /// Maximum number of editor events buffered between drains (default: 32).
    pub max_events: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            bond_length: DEFAULT_BOND_LENGTH,
            atom_capture_radius: DEFAULT_ATOM_RADIUS,
            bond_capture_radius: DEFAULT_BOND_RADIUS,
            drag_threshold: DEFAULT_DRAG_THRESHOLD,
            stroke_offset: DEFAULT_STROKE_OFFSET,
            growth_policy: GrowthPolicy::default(),
            element: "C".to_string(),
            bond_order: 1,
            max_events: 32,
        }
    }
}

impl EditorConfig {
    /// Parse a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reset every distance that is non-finite or not positive to its
    /// default, so grown atoms always land at finite positions.
    fn sanitize_lengths(&mut self) {
        let defaults = Self::default();
        let fields = [
            ("bond_length", &mut self.bond_length, defaults.bond_length),
            (
                "atom_capture_radius",
                &mut self.atom_capture_radius,
                defaults.atom_capture_radius,
            ),
            (
                "bond_capture_radius",
                &mut self.bond_capture_radius,
                defaults.bond_capture_radius,
            ),
            ("drag_threshold", &mut self.drag_threshold, defaults.drag_threshold),
            ("stroke_offset", &mut self.stroke_offset, defaults.stroke_offset),
        ];
        for (name, value, default) in fields {
            if !value.is_finite() || *value <= 0.0 {
                log::warn!("invalid {} {}, using {}", name, value, default);
                *value = default;
            }
        }
    }
}

/// A change committed to the molecule (or selection).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    /// A free atom was placed on empty canvas.
    AtomPlaced(AtomId),
    /// A new atom was grown from an existing one.
    Grown { atom: AtomId, bond: BondId },
    /// Two existing atoms were bonded.
    Connected(BondId),
    /// A new atom was placed toward the pointer release point.
    Extended { atom: AtomId, bond: BondId },
    AtomErased(AtomId),
    BondErased(BondId),
    Selected(Option<AtomId>),
}

/// Outcome of a UI entry point: an edit, nothing, or a silent rejection.
pub type EditResult = Result<Option<Edit>, Rejection>;

/// Molecule editor. Single writer of its molecule.
pub struct Editor {
    molecule: Molecule,
    gesture: GestureMachine,
    config: EditorConfig,
    mode: Mode,
    element: String,
    bond_order: BondOrder,
    selected: Option<AtomId>,
    events: Vec<EditorEvent>,
}

impl Editor {
    pub fn new(mut config: EditorConfig) -> Self {
        config.sanitize_lengths();
        let element = match elements::lookup(&config.element) {
            Some((symbol, _)) => symbol.to_string(),
            None => {
                log::warn!("unknown default element {:?}, using carbon", config.element);
                "C".to_string()
            }
        };
        let bond_order = BondOrder::from_u8(config.bond_order).unwrap_or_else(|| {
            log::warn!("invalid default bond order {}, using single", config.bond_order);
            BondOrder::Single
        });
        log::info!(
            "editor ready: element={} order={} bond_length={} policy={:?}",
            element,
            bond_order.value(),
            config.bond_length,
            config.growth_policy
        );

        Self {
            molecule: Molecule::new(),
            gesture: GestureMachine::new(config.drag_threshold),
            events: Vec::with_capacity(config.max_events),
            config,
            mode: Mode::default(),
            element,
            bond_order,
            selected: None,
        }
    }

    // -- Configuration --

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Switch toolbar mode. An open gesture is abandoned.
    pub fn set_mode(&mut self, mode: Mode) {
        if mode == self.mode {
            return;
        }
        if self.gesture.is_active() {
            log::debug!("mode change to {:?} cancels open gesture", mode);
            self.gesture.cancel();
        }
        self.mode = mode;
    }

    /// Element used for new atoms.
    pub fn element(&self) -> &str {
        &self.element
    }

    /// Select the element for new atoms. Only table elements are accepted.
    pub fn set_element(&mut self, symbol: &str) -> bool {
        match elements::lookup(symbol) {
            Some((canonical, _)) => {
                self.element = canonical.to_string();
                true
            }
            None => {
                log::debug!("ignoring unknown element {:?}", symbol);
                false
            }
        }
    }

    /// Bond order used for new bonds.
    pub fn bond_order(&self) -> BondOrder {
        self.bond_order
    }

    /// Select the bond order for new bonds. Only 1, 2 and 3 are accepted.
    pub fn set_bond_order(&mut self, order: u8) -> bool {
        match BondOrder::from_u8(order) {
            Some(order) => {
                self.bond_order = order;
                true
            }
            None => {
                log::debug!("ignoring invalid bond order {}", order);
                false
            }
        }
    }

    // -- Read access --

    /// Read-only view of the current molecule for rendering.
    pub fn snapshot(&self) -> &Molecule {
        &self.molecule
    }

    pub fn selected_atom(&self) -> Option<AtomId> {
        self.selected
    }

    pub fn gesture_state(&self) -> GestureState {
        self.gesture.state()
    }

    /// Preview line while dragging: origin atom position to pointer.
    pub fn preview(&self) -> Option<(Vec2, Vec2)> {
        let (origin, current) = self.gesture.preview()?;
        let atom = self.molecule.atom(origin)?;
        Some((atom.position, current))
    }

    /// Strokes to paint for every bond.
    pub fn bond_strokes(&self) -> Vec<BondStroke> {
        molecule_strokes(&self.molecule, self.config.stroke_offset)
    }

    /// Events produced since the last drain.
    pub fn events(&self) -> &[EditorEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.events)
    }

    // -- Pointer entry points --

    /// Pointer pressed; hit-tests for an atom and dispatches.
    pub fn on_pointer_down(&mut self, pos: Vec2) -> EditResult {
        if !finite_or_warn(pos) {
            return Ok(None);
        }
        match atom_at(pos, &self.molecule, self.config.atom_capture_radius) {
            Some(atom) => self.on_pointer_down_on_atom(atom, pos),
            None => self.on_pointer_down_on_empty(pos),
        }
    }

    /// Pointer pressed on a known atom.
    pub fn on_pointer_down_on_atom(&mut self, atom: AtomId, pos: Vec2) -> EditResult {
        self.gesture.cancel();
        if !finite_or_warn(pos) {
            return Ok(None);
        }
        if !self.molecule.contains_atom(atom) {
            return Err(self.reject(Rejection::DanglingReference { atom }));
        }
        match self.mode {
            Mode::Select => Ok(Some(self.select(Some(atom)))),
            Mode::AtomPlacement => {
                self.gesture.on_pointer_down_on_atom(atom, pos);
                Ok(None)
            }
            Mode::Erase => Ok(self.erase_atom(atom)),
        }
    }

    /// Pointer pressed on empty canvas. Handled immediately; no session.
    pub fn on_pointer_down_on_empty(&mut self, pos: Vec2) -> EditResult {
        self.gesture.cancel();
        if !finite_or_warn(pos) {
            return Ok(None);
        }
        match self.mode {
            Mode::Select => Ok(Some(self.select(None))),
            Mode::AtomPlacement => Ok(Some(self.place_atom(pos))),
            Mode::Erase => Ok(self.erase_at(pos)),
        }
    }

    /// Pointer moved. Only the gesture (and preview) changes.
    pub fn on_pointer_move(&mut self, pos: Vec2) {
        if finite_or_warn(pos) {
            self.gesture.on_pointer_move(pos);
        }
    }

    /// Pointer released. Ends any session and commits its outcome.
    pub fn on_pointer_up(&mut self, pos: Vec2) -> EditResult {
        if !finite_or_warn(pos) || self.mode != Mode::AtomPlacement {
            self.gesture.cancel();
            return Ok(None);
        }
        let under = atom_at(pos, &self.molecule, self.config.atom_capture_radius);
        match self.gesture.on_pointer_up(pos, under) {
            GestureOutcome::None => Ok(None),
            GestureOutcome::Grow { origin } => self.grow(origin).map(Some),
            GestureOutcome::Connect { from, to } => self.connect(from, to).map(Some),
            GestureOutcome::Extend { origin, toward } => self.extend(origin, toward).map(Some),
        }
    }

    // -- Mutations --

    /// Place a free atom of the selected element.
    pub fn place_atom(&mut self, pos: Vec2) -> Edit {
        let atom = self.molecule.add_atom(pos, &self.element);
        self.committed(Edit::AtomPlaced(atom))
    }

    /// Grow a new atom from `origin` at the next growth angle.
    pub fn grow(&mut self, origin: AtomId) -> Result<Edit, Rejection> {
        let result = self.try_grow(origin);
        self.finish(result)
    }

    /// Bond two existing atoms with the selected order.
    pub fn connect(&mut self, from: AtomId, to: AtomId) -> Result<Edit, Rejection> {
        let result = self.try_connect(from, to);
        self.finish(result)
    }

    /// Grow a new atom from `origin` in the direction of `toward`.
    pub fn extend(&mut self, origin: AtomId, toward: Vec2) -> Result<Edit, Rejection> {
        let result = self.try_extend(origin, toward);
        self.finish(result)
    }

    /// Erase the atom under `pos`, or failing that the bond under it.
    pub fn erase_at(&mut self, pos: Vec2) -> Option<Edit> {
        if let Some(atom) = atom_at(pos, &self.molecule, self.config.atom_capture_radius) {
            return self.erase_atom(atom);
        }
        let bond = bond_at(pos, &self.molecule, self.config.bond_capture_radius)?;
        self.erase_bond(bond)
    }

    /// Erase an atom and its bonds. `None` if it does not exist.
    pub fn erase_atom(&mut self, atom: AtomId) -> Option<Edit> {
        self.molecule.remove_atom(atom)?;
        if self.selected == Some(atom) {
            self.select(None);
        }
        Some(self.committed(Edit::AtomErased(atom)))
    }

    /// Erase a bond. `None` if it does not exist.
    pub fn erase_bond(&mut self, bond: BondId) -> Option<Edit> {
        self.molecule.remove_bond(bond)?;
        Some(self.committed(Edit::BondErased(bond)))
    }

    /// Remove everything and abandon any gesture.
    pub fn clear(&mut self) {
        self.gesture.cancel();
        self.molecule.clear();
        self.selected = None;
        log::info!("molecule cleared");
        self.push_counts();
    }

    // -- Event queue --

    /// Apply one UI event.
    pub fn apply(&mut self, event: &InputEvent) -> EditResult {
        match event {
            InputEvent::PointerDown { x, y } => self.on_pointer_down(Vec2::new(*x, *y)),
            InputEvent::PointerDownOnAtom { atom, x, y } => {
                self.on_pointer_down_on_atom(*atom, Vec2::new(*x, *y))
            }
            InputEvent::PointerDownOnEmpty { x, y } => {
                self.on_pointer_down_on_empty(Vec2::new(*x, *y))
            }
            InputEvent::PointerMove { x, y } => {
                self.on_pointer_move(Vec2::new(*x, *y));
                Ok(None)
            }
            InputEvent::PointerUp { x, y } => self.on_pointer_up(Vec2::new(*x, *y)),
            InputEvent::SetMode(mode) => {
                self.set_mode(*mode);
                Ok(None)
            }
            InputEvent::SetElement(symbol) => {
                self.set_element(symbol);
                Ok(None)
            }
            InputEvent::SetBondOrder(order) => {
                self.set_bond_order(*order);
                Ok(None)
            }
            InputEvent::Clear => {
                self.clear();
                Ok(None)
            }
        }
    }

    /// Apply every queued event in order. Returns the committed edits.
    pub fn update(&mut self, input: &InputQueue) -> Vec<Edit> {
        input
            .iter()
            .filter_map(|event| self.apply(event).ok().flatten())
            .collect()
    }

    // -- Internals --

    fn try_grow(&mut self, origin: AtomId) -> Result<Edit, Rejection> {
        let order = self.bond_order;
        check_endpoints(&[origin], &self.molecule, order)?;
        self.check_new_atom(origin, order)?;
        let pos = growth_position(
            origin,
            &self.molecule,
            self.config.growth_policy,
            self.config.bond_length,
        )
        .ok_or(Rejection::DanglingReference { atom: origin })?;
        let (atom, bond) = self.attach_new_atom(origin, pos, order)?;
        Ok(Edit::Grown { atom, bond })
    }

    fn try_connect(&mut self, from: AtomId, to: AtomId) -> Result<Edit, Rejection> {
        for atom in [from, to] {
            if !self.molecule.contains_atom(atom) {
                return Err(Rejection::DanglingReference { atom });
            }
        }
        if from == to {
            return Err(Rejection::SelfBond { atom: from });
        }
        if self.molecule.bond_between(from, to).is_some() {
            return Err(Rejection::DuplicateBond { begin: from, end: to });
        }
        check_endpoints(&[from, to], &self.molecule, self.bond_order)?;
        let bond = self.molecule.add_bond(from, to, self.bond_order)?;
        Ok(Edit::Connected(bond))
    }

    fn try_extend(&mut self, origin: AtomId, toward: Vec2) -> Result<Edit, Rejection> {
        let order = self.bond_order;
        check_endpoints(&[origin], &self.molecule, order)?;
        self.check_new_atom(origin, order)?;
        let start = self
            .molecule
            .atom(origin)
            .ok_or(Rejection::DanglingReference { atom: origin })?
            .position;
        let pos = extension_position(start, toward, self.config.bond_length)
            .or_else(|| {
                growth_position(
                    origin,
                    &self.molecule,
                    self.config.growth_policy,
                    self.config.bond_length,
                )
            })
            .ok_or(Rejection::DanglingReference { atom: origin })?;
        let (atom, bond) = self.attach_new_atom(origin, pos, order)?;
        Ok(Edit::Extended { atom, bond })
    }

    /// A brand-new atom of the selected element must itself be able to hold
    /// the bond. Reported against the atom it would attach to.
    fn check_new_atom(&self, origin: AtomId, order: BondOrder) -> Result<(), Rejection> {
        if order.value() as u32 > max_valence(&self.element) {
            return Err(Rejection::ValenceExceeded { atom: origin });
        }
        Ok(())
    }

    /// Add an atom and bond it to `origin`; the atom is removed again if the
    /// bond cannot be made.
    fn attach_new_atom(
        &mut self,
        origin: AtomId,
        pos: Vec2,
        order: BondOrder,
    ) -> Result<(AtomId, BondId), Rejection> {
        let atom = self.molecule.add_atom(pos, &self.element);
        match self.molecule.add_bond(origin, atom, order) {
            Ok(bond) => Ok((atom, bond)),
            Err(rejection) => {
                self.molecule.remove_atom(atom);
                Err(rejection)
            }
        }
    }

    fn select(&mut self, atom: Option<AtomId>) -> Edit {
        self.selected = atom;
        let code = atom.map_or(-1.0, |a| a.0 as f32);
        self.push_event(EditorEvent::new(EditorEvent::SELECTION, code));
        Edit::Selected(atom)
    }

    fn finish(&mut self, result: Result<Edit, Rejection>) -> Result<Edit, Rejection> {
        match result {
            Ok(edit) => Ok(self.committed(edit)),
            Err(rejection) => Err(self.reject(rejection)),
        }
    }

    fn committed(&mut self, edit: Edit) -> Edit {
        log::debug!("committed {:?}", edit);
        self.push_counts();
        edit
    }

    fn reject(&mut self, rejection: Rejection) -> Rejection {
        log::debug!("gesture dropped: {}", rejection);
        self.push_event(EditorEvent {
            kind: EditorEvent::REJECTED,
            a: rejection.code() as f32,
            b: rejection.atom().0 as f32,
            c: 0.0,
        });
        rejection
    }

    fn push_counts(&mut self) {
        let atoms = self.molecule.atom_count() as f32;
        let bonds = self.molecule.bond_count() as f32;
        self.push_event(EditorEvent::new(EditorEvent::ATOM_COUNT, atoms));
        self.push_event(EditorEvent::new(EditorEvent::BOND_COUNT, bonds));
    }

    fn push_event(&mut self, event: EditorEvent) {
        if self.events.len() < self.config.max_events {
            self.events.push(event);
        }
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

fn finite_or_warn(pos: Vec2) -> bool {
    if pos.is_finite() {
        true
    } else {
        log::warn!("ignoring non-finite pointer position {:?}", pos);
        false
    }
}
