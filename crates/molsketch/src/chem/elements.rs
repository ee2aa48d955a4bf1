//! Element table: symbols the editor recognizes and their maximum valence.
//!
//! Symbols compare case-insensitively but are stored in their canonical
//! mixed-case spelling (e.g. "Cl").

/// Max valence used for symbols missing from the table.
pub const DEFAULT_MAX_VALENCE: u8 = 4;

/// (canonical symbol, maximum bond-order sum)
pub const ELEMENTS: &[(&str, u8)] = &[
    ("C", 4),
    ("N", 3),
    ("O", 2),
    ("S", 2),
    ("P", 3),
    ("Cl", 1),
    ("Br", 1),
    ("I", 1),
    ("F", 1),
    ("H", 1),
];

/// Common elements for the quick-select toolbar.
pub const COMMON_ELEMENTS: &[&str] = &["C", "N", "O", "S", "P", "H", "F", "Cl", "Br", "I"];

/// Look up a symbol in the table, ignoring case.
pub fn lookup(symbol: &str) -> Option<(&'static str, u8)> {
    let symbol = symbol.trim();
    ELEMENTS
        .iter()
        .find(|(s, _)| s.eq_ignore_ascii_case(symbol))
        .copied()
}

/// Canonical spelling of a symbol.
/// Known symbols take the table's spelling; anything else is title-cased.
pub fn canonical_symbol(symbol: &str) -> String {
    if let Some((canonical, _)) = lookup(symbol) {
        return canonical.to_string();
    }
    let mut chars = symbol.trim().chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(lookup("cl"), Some(("Cl", 1)));
        assert_eq!(lookup("CL"), Some(("Cl", 1)));
        assert_eq!(lookup("n"), Some(("N", 3)));
        assert_eq!(lookup("Xe"), None);
    }

    #[test]
    fn canonical_symbols() {
        assert_eq!(canonical_symbol("bR"), "Br");
        assert_eq!(canonical_symbol("c"), "C");
        assert_eq!(canonical_symbol("xe"), "Xe");
        assert_eq!(canonical_symbol(""), "");
    }

    #[test]
    fn quick_select_elements_are_known() {
        for symbol in COMMON_ELEMENTS {
            assert!(lookup(symbol).is_some(), "{} missing from table", symbol);
        }
    }
}
