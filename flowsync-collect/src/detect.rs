//! Whitespace-insensitive change detection.
//!
//! Template exports re-wrap and re-indent bodies, so byte equality would
//! flag every re-indented file as changed. Equality here ignores all
//! whitespace: reflowed lines, tabs-vs-spaces, and added blank lines never
//! count as a change.

/// True when the stored field already matches the candidate content.
///
/// An absent stored field never matches — first population must always
/// register as an update.
pub fn contents_match(stored: Option<&str>, candidate: &str) -> bool {
    let Some(stored) = stored else {
        return false;
    };
    strip_whitespace(stored) == strip_whitespace(candidate)
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_content_matches() {
        assert!(contents_match(Some("return msg;"), "return msg;"));
    }

    #[test]
    fn reindented_and_reflowed_content_matches() {
        let stored = "if (x) {\n    y();\n}";
        let candidate = "if (x) {\n\n\ty();\n}\n";
        assert!(contents_match(Some(stored), candidate));
    }

    #[test]
    fn different_tokens_do_not_match() {
        assert!(!contents_match(Some("return msg;"), "return msg2;"));
    }

    #[test]
    fn absent_stored_field_never_matches() {
        assert!(!contents_match(None, ""));
        assert!(!contents_match(None, "anything"));
    }

    #[test]
    fn whitespace_inside_string_literals_is_invisible_too() {
        // The normalization does not tokenize; "a b" and "ab" compare equal.
        assert!(contents_match(Some(r#"send("a b")"#), r#"send("ab")"#));
    }
}
