use molsketch::{
    free_valence, AtomId, BondStroke, Editor, EditorConfig, EditorEvent, InputEvent, InputQueue,
};

/// Floats per packed atom: x, y, id, free valence (wire format).
pub const ATOM_FLOATS: usize = 4;

/// Owns the editor and the flat buffers JavaScript reads after each flush.
///
/// The exported free functions in `lib.rs` keep one runner in a
/// `thread_local!`, because wasm-bindgen cannot export it directly.
pub struct EditorRunner {
    editor: Editor,
    input: InputQueue,
    stroke_buffer: Vec<BondStroke>,
    atom_buffer: Vec<f32>,
    event_buffer: Vec<EditorEvent>,
}

impl EditorRunner {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            editor: Editor::new(config),
            input: InputQueue::new(),
            stroke_buffer: Vec::new(),
            atom_buffer: Vec::new(),
            event_buffer: Vec::new(),
        }
    }

    /// Build from a JSON config; malformed JSON falls back to defaults.
    pub fn from_json(json: &str) -> Self {
        let config = EditorConfig::from_json(json).unwrap_or_else(|err| {
            log::warn!("invalid editor config ({}), using defaults", err);
            EditorConfig::default()
        });
        Self::new(config)
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    /// Queue an input event until the next flush.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Apply queued events, then repack the buffers.
    pub fn flush(&mut self) {
        for event in self.input.drain() {
            if let Err(rejection) = self.editor.apply(&event) {
                log::trace!("{:?} dropped: {}", event, rejection);
            }
        }

        self.stroke_buffer = self.editor.bond_strokes();

        let molecule = self.editor.snapshot();
        self.atom_buffer.clear();
        for atom in molecule.atoms() {
            self.atom_buffer.extend_from_slice(&[
                atom.position.x,
                atom.position.y,
                atom.id.0 as f32,
                free_valence(atom.id, molecule) as f32,
            ]);
        }

        self.event_buffer = self.editor.drain_events();
    }

    /// Current molecule as JSON for the renderer.
    pub fn snapshot_json(&self) -> String {
        serde_json::to_string(self.editor.snapshot()).unwrap_or_else(|err| {
            log::error!("snapshot serialization failed: {}", err);
            String::from("{\"atoms\":[],\"bonds\":[]}")
        })
    }

    /// Drag preview as [x0, y0, x1, y1], empty when not dragging.
    pub fn preview(&self) -> Vec<f32> {
        match self.editor.preview() {
            Some((from, to)) => vec![from.x, from.y, to.x, to.y],
            None => Vec::new(),
        }
    }

    /// Element symbol of an atom, empty if it does not exist.
    pub fn element_of(&self, atom: AtomId) -> String {
        self.editor
            .snapshot()
            .atom(atom)
            .map(|a| a.element.clone())
            .unwrap_or_default()
    }

    // ---- Pointer accessors for direct memory reads ----

    pub fn strokes_ptr(&self) -> *const f32 {
        self.stroke_floats().as_ptr()
    }

    pub fn stroke_count(&self) -> u32 {
        self.stroke_buffer.len() as u32
    }

    pub fn atoms_ptr(&self) -> *const f32 {
        self.atom_floats().as_ptr()
    }

    pub fn atom_count(&self) -> u32 {
        (self.atom_buffer.len() / ATOM_FLOATS) as u32
    }

    pub fn events_ptr(&self) -> *const f32 {
        self.event_floats().as_ptr()
    }

    pub fn events_len(&self) -> u32 {
        self.event_buffer.len() as u32
    }

    /// Packed atom buffer; `atoms_ptr` points at its start.
    pub fn atom_floats(&self) -> &[f32] {
        &self.atom_buffer
    }

    pub fn stroke_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.stroke_buffer)
    }

    pub fn event_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.event_buffer)
    }
}

impl Default for EditorRunner {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use molsketch::Mode;

    fn place(runner: &mut EditorRunner, x: f32, y: f32) {
        runner.push_input(InputEvent::PointerDownOnEmpty { x, y });
        runner.push_input(InputEvent::PointerUp { x, y });
    }

    #[test]
    fn nothing_applies_before_flush() {
        let mut runner = EditorRunner::default();
        place(&mut runner, 10.0, 10.0);
        assert_eq!(runner.editor().snapshot().atom_count(), 0);
        runner.flush();
        assert_eq!(runner.editor().snapshot().atom_count(), 1);
        assert_eq!(runner.atom_count(), 1);
    }

    #[test]
    fn flush_packs_atoms_and_strokes() {
        let mut runner = EditorRunner::default();
        place(&mut runner, 100.0, 100.0);
        runner.push_input(InputEvent::SetBondOrder(2));
        runner.push_input(InputEvent::PointerDown { x: 100.0, y: 100.0 });
        runner.push_input(InputEvent::PointerUp { x: 100.0, y: 100.0 });
        runner.flush();

        let atoms = runner.atom_floats();
        assert_eq!(atoms.len(), 2 * ATOM_FLOATS);
        assert_eq!(&atoms[..4], &[100.0, 100.0, 0.0, 2.0]);
        assert!((atoms[4] - 140.0).abs() < 1e-3);

        // Terminal double bond: two centered strokes.
        assert_eq!(runner.stroke_count(), 2);
        assert_eq!(runner.stroke_floats().len(), 2 * BondStroke::FLOATS);
        assert_eq!(runner.strokes_ptr(), runner.stroke_floats().as_ptr());
        assert_eq!(runner.atoms_ptr(), runner.atom_floats().as_ptr());
    }

    #[test]
    fn events_are_flattened() {
        let mut runner = EditorRunner::default();
        place(&mut runner, 0.0, 0.0);
        runner.flush();
        let floats = runner.event_floats();
        assert_eq!(runner.events_len(), 2);
        assert_eq!(floats.len(), 2 * EditorEvent::FLOATS);
        assert_eq!(floats[0], EditorEvent::ATOM_COUNT);
        assert_eq!(floats[1], 1.0);

        runner.flush();
        assert_eq!(runner.events_len(), 0);
    }

    #[test]
    fn snapshot_json_lists_atoms() {
        let mut runner = EditorRunner::default();
        runner.push_input(InputEvent::SetElement("cl".into()));
        place(&mut runner, 5.0, 6.0);
        runner.flush();
        let json: serde_json::Value = serde_json::from_str(&runner.snapshot_json()).unwrap();
        assert_eq!(json["atoms"][0]["element"], "Cl");
        assert_eq!(json["atoms"][0]["position"][0], 5.0);
        assert_eq!(runner.element_of(AtomId(0)), "Cl");
        assert_eq!(runner.element_of(AtomId(3)), "");
    }

    #[test]
    fn preview_while_dragging() {
        let mut runner = EditorRunner::default();
        place(&mut runner, 0.0, 0.0);
        runner.push_input(InputEvent::PointerDown { x: 0.0, y: 0.0 });
        runner.push_input(InputEvent::PointerMove { x: 30.0, y: 0.0 });
        runner.flush();
        assert_eq!(runner.preview(), vec![0.0, 0.0, 30.0, 0.0]);

        runner.push_input(InputEvent::SetMode(Mode::Erase));
        runner.flush();
        assert!(runner.preview().is_empty());
    }

    #[test]
    fn bad_json_config_uses_defaults() {
        let runner = EditorRunner::from_json("not json");
        assert_eq!(runner.editor().config(), &EditorConfig::default());
        let runner = EditorRunner::from_json(r#"{ "bond_length": 25.0 }"#);
        assert_eq!(runner.editor().config().bond_length, 25.0);
    }
}
