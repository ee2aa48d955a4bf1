//! `#[wasm_bindgen]` exports for the molecule editor.
//!
//! JavaScript forwards pointer and toolbar events as they happen, calls
//! `editor_flush()` once per animation frame, then reads the packed stroke,
//! atom and event buffers straight out of WASM memory.

pub mod runner;

pub use runner::{EditorRunner, ATOM_FLOATS};

use std::cell::RefCell;

use molsketch::{AtomId, BondStroke, EditorEvent, InputEvent, Mode};
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<EditorRunner>> = RefCell::new(None);
}

fn with_runner<R>(f: impl FnOnce(&mut EditorRunner) -> R) -> R {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        let runner = borrow
            .as_mut()
            .expect("Editor not initialized. Call editor_init() first.");
        f(runner)
    })
}

/// Create the editor. `config_json` may be omitted or partial.
#[wasm_bindgen]
pub fn editor_init(config_json: Option<String>) {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let runner = match config_json.as_deref() {
        Some(json) => EditorRunner::from_json(json),
        None => EditorRunner::default(),
    };
    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    log::info!("molsketch: initialized");
}

#[wasm_bindgen]
pub fn editor_flush() {
    with_runner(|r| r.flush());
}

// ---- Pointer input ----

#[wasm_bindgen]
pub fn editor_pointer_down(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerDown { x, y }));
}

#[wasm_bindgen]
pub fn editor_pointer_down_on_atom(atom: u32, x: f32, y: f32) {
    with_runner(|r| {
        r.push_input(InputEvent::PointerDownOnAtom {
            atom: AtomId(atom),
            x,
            y,
        })
    });
}

#[wasm_bindgen]
pub fn editor_pointer_down_on_empty(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerDownOnEmpty { x, y }));
}

#[wasm_bindgen]
pub fn editor_pointer_move(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerMove { x, y }));
}

#[wasm_bindgen]
pub fn editor_pointer_up(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerUp { x, y }));
}

// ---- Toolbar ----

/// 0 = select, 1 = atom placement, 2 = erase.
#[wasm_bindgen]
pub fn editor_set_mode(code: u32) {
    match Mode::from_code(code) {
        Some(mode) => with_runner(|r| r.push_input(InputEvent::SetMode(mode))),
        None => log::warn!("unknown mode code {}", code),
    }
}

#[wasm_bindgen]
pub fn editor_set_element(symbol: &str) {
    with_runner(|r| r.push_input(InputEvent::SetElement(symbol.to_string())));
}

#[wasm_bindgen]
pub fn editor_set_bond_order(order: u32) {
    // Out-of-range orders map to 0, which the editor ignores.
    let order = u8::try_from(order).unwrap_or(0);
    with_runner(|r| r.push_input(InputEvent::SetBondOrder(order)));
}

#[wasm_bindgen]
pub fn editor_clear() {
    with_runner(|r| r.push_input(InputEvent::Clear));
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn editor_snapshot_json() -> String {
    with_runner(|r| r.snapshot_json())
}

/// [x0, y0, x1, y1] of the drag preview line, empty when not dragging.
#[wasm_bindgen]
pub fn editor_preview() -> js_sys::Float32Array {
    with_runner(|r| js_sys::Float32Array::from(r.preview().as_slice()))
}

#[wasm_bindgen]
pub fn editor_element_of(atom: u32) -> String {
    with_runner(|r| r.element_of(AtomId(atom)))
}

#[wasm_bindgen]
pub fn get_strokes_ptr() -> *const f32 {
    with_runner(|r| r.strokes_ptr())
}

#[wasm_bindgen]
pub fn get_stroke_count() -> u32 {
    with_runner(|r| r.stroke_count())
}

#[wasm_bindgen]
pub fn get_atoms_ptr() -> *const f32 {
    with_runner(|r| r.atoms_ptr())
}

#[wasm_bindgen]
pub fn get_atom_count() -> u32 {
    with_runner(|r| r.atom_count())
}

#[wasm_bindgen]
pub fn get_events_ptr() -> *const f32 {
    with_runner(|r| r.events_ptr())
}

#[wasm_bindgen]
pub fn get_events_len() -> u32 {
    with_runner(|r| r.events_len())
}

// ---- Wire format sizes ----

#[wasm_bindgen]
pub fn get_stroke_floats() -> u32 {
    BondStroke::FLOATS as u32
}

#[wasm_bindgen]
pub fn get_atom_floats() -> u32 {
    ATOM_FLOATS as u32
}

#[wasm_bindgen]
pub fn get_event_floats() -> u32 {
    EditorEvent::FLOATS as u32
}
