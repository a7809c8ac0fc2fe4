//! The escaping rule shared by the Legality Checker and the Edit Planner
//! (spec §4.5 item 1, §4.6 "Escaping rule").

/// Prepend a single backslash if `name` is a reserved identifier of the
/// host language; otherwise return it unchanged.
pub fn escape(name: &str) -> String {
    if rn_ast::is_reserved_word(name) {
        format!("\\{name}")
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_word_gets_escaped() {
        assert_eq!(escape("data"), "\\data");
    }

    #[test]
    fn ordinary_name_is_unchanged() {
        assert_eq!(escape("foo"), "foo");
    }
}
