//! End-to-end editing sessions driven through the public pointer API.

use glam::Vec2;
use molsketch::{
    current_valence, max_valence, AtomId, BondOrder, Edit, Editor, EditorConfig, InputEvent,
    InputQueue, Mode, Molecule, Rejection,
};

fn assert_valence_ok(mol: &Molecule) {
    for atom in mol.atoms() {
        assert!(
            current_valence(atom.id, mol) <= max_valence(&atom.element),
            "atom {:?} ({}) over valence",
            atom.id,
            atom.element
        );
    }
}

fn assert_no_dangling(mol: &Molecule) {
    for bond in mol.bonds() {
        assert!(mol.atom(bond.begin).is_some());
        assert!(mol.atom(bond.end).is_some());
        assert_ne!(bond.begin, bond.end);
    }
}

#[test]
fn grow_chain_until_carbon_is_saturated() {
    let mut editor = Editor::default();
    let a = match editor.place_atom(Vec2::new(100.0, 100.0)) {
        Edit::AtomPlaced(id) => id,
        other => panic!("unexpected {:?}", other),
    };

    let Edit::Grown { atom: b, bond } = editor.grow(a).unwrap() else {
        panic!("expected growth");
    };
    let mol = editor.snapshot();
    let b_pos = mol.atom(b).unwrap().position;
    assert!((b_pos - Vec2::new(140.0, 100.0)).length() < 1e-3);
    assert_eq!(mol.bond(bond).unwrap().order, BondOrder::Single);

    editor.grow(a).unwrap();
    editor.grow(a).unwrap();
    assert_eq!(current_valence(a, editor.snapshot()), 3);

    editor.set_bond_order(2);
    assert_eq!(editor.grow(a), Err(Rejection::ValenceExceeded { atom: a }));
    assert_eq!(editor.snapshot().bond_count(), 3);
    assert_valence_ok(editor.snapshot());
}

#[test]
fn oxygen_pair_bonds_once() {
    let mut editor = Editor::default();
    editor.set_element("O");
    let mut queue = InputQueue::new();
    for (x, y) in [(100.0, 100.0), (200.0, 100.0)] {
        queue.push(InputEvent::PointerDownOnEmpty { x, y });
        queue.push(InputEvent::PointerUp { x, y });
    }
    for _ in 0..2 {
        queue.push(InputEvent::PointerDownOnAtom { atom: AtomId(0), x: 100.0, y: 100.0 });
        queue.push(InputEvent::PointerMove { x: 150.0, y: 100.0 });
        queue.push(InputEvent::PointerUp { x: 200.0, y: 100.0 });
    }

    let edits = editor.update(&queue);
    let connects = edits
        .iter()
        .filter(|e| matches!(e, Edit::Connected(_)))
        .count();
    assert_eq!(connects, 1);

    let mol = editor.snapshot();
    assert_eq!(mol.bond_count(), 1);
    let bond = mol.bonds().next().unwrap();
    assert_eq!(bond.order, BondOrder::Single);
    assert!(bond.connects(AtomId(0), AtomId(1)));
}

#[test]
fn erasing_atom_leaves_no_references() {
    let mut editor = Editor::default();
    editor.place_atom(Vec2::new(0.0, 0.0));
    for _ in 0..4 {
        editor.grow(AtomId(0)).unwrap();
    }
    editor.set_mode(Mode::Erase);
    editor.on_pointer_down(Vec2::new(1.0, 1.0)).unwrap();
    editor.on_pointer_up(Vec2::new(1.0, 1.0)).unwrap();

    let mol = editor.snapshot();
    assert!(mol.atom(AtomId(0)).is_none());
    assert!(mol.bonds().all(|b| !b.touches(AtomId(0))));
    assert_eq!(mol.atom_count(), 4);
    assert_eq!(mol.bond_count(), 0);
}

/// Pseudo-random gesture storm; the molecule invariants must hold after
/// every single event.
#[test]
fn invariants_hold_through_random_gestures() {
    let mut editor = Editor::new(EditorConfig {
        max_events: 0,
        ..EditorConfig::default()
    });
    let elements = ["C", "N", "O", "S", "P", "Cl", "Br", "I", "F", "H"];
    let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = move || {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        seed
    };

    for _ in 0..2000 {
        let r = next();
        let x = (r % 400) as f32;
        let y = ((r >> 16) % 400) as f32;
        let pos = Vec2::new(x, y);
        match (r >> 32) % 10 {
            0 => {
                editor.set_element(elements[((r >> 40) % elements.len() as u64) as usize]);
            }
            1 => {
                editor.set_bond_order(((r >> 40) % 4) as u8);
            }
            2 => {
                let mode = match (r >> 40) % 6 {
                    0 => Mode::Erase,
                    1 => Mode::Select,
                    _ => Mode::AtomPlacement,
                };
                editor.set_mode(mode);
            }
            3 | 4 => {
                let _ = editor.on_pointer_down(pos);
            }
            5 | 6 => editor.on_pointer_move(pos),
            _ => {
                // Snap to an existing atom now and then so connects happen.
                let target = editor
                    .snapshot()
                    .atoms()
                    .nth(((r >> 40) % 7) as usize)
                    .map(|a| a.position)
                    .unwrap_or(pos);
                let _ = editor.on_pointer_up(target);
            }
        }
        assert_valence_ok(editor.snapshot());
        assert_no_dangling(editor.snapshot());
    }
}
