//! Composition of typed record content from marker-wrapped sections.
//!
//! A typed record's stored body is the concatenation of up to three
//! segments: the shared declaration block, the file-local declaration
//! block, and the function body. The marker lines let the companion
//! export tooling split the stored content back apart.

/// Opens the shared declaration block.
pub const GLOBAL_START: &str = "// Global Definition";
/// Closes the shared declaration block.
pub const GLOBAL_END: &str = "// Global Definition End";

/// Opens the file-local declaration block.
pub const LOCAL_START: &str = "// Local Definition";
/// Closes the file-local declaration block.
pub const LOCAL_END: &str = "// Local Definition End";

/// Compose stored content from shared declarations, local declarations, and
/// the function body.
///
/// Each declaration block that is non-empty after trimming is wrapped in its
/// marker pair; segments are joined by exactly one blank line; empty segments
/// are omitted entirely — no marker pair, no separator. Ordering is fixed:
/// global, then local, then body.
pub fn compose_sections(global: &str, local: &str, body: &str) -> String {
    let mut sections = Vec::new();

    let global = global.trim();
    if !global.is_empty() {
        sections.push(format!("{GLOBAL_START}\n{global}\n{GLOBAL_END}"));
    }

    let local = local.trim();
    if !local.is_empty() {
        sections.push(format!("{LOCAL_START}\n{local}\n{LOCAL_END}"));
    }

    let body = body.trim();
    if !body.is_empty() {
        sections.push(body.to_owned());
    }

    sections.join("\n\n")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_three_sections_in_order() {
        let composed = compose_sections("G", "L", "B");
        assert_eq!(
            composed,
            "// Global Definition\nG\n// Global Definition End\n\n\
             // Local Definition\nL\n// Local Definition End\n\n\
             B"
        );
    }

    #[test]
    fn body_only_has_no_marker_blocks() {
        assert_eq!(compose_sections("", "", "B"), "B");
    }

    #[test]
    fn whitespace_only_blocks_are_omitted() {
        let composed = compose_sections("  \n\t", "\n", "B");
        assert_eq!(composed, "B");
    }

    #[test]
    fn blocks_are_trimmed_before_wrapping() {
        let composed = compose_sections("\n  G  \n", "", "B");
        assert_eq!(
            composed,
            "// Global Definition\nG\n// Global Definition End\n\nB"
        );
    }

    #[test]
    fn local_without_global_keeps_single_separator() {
        let composed = compose_sections("", "L", "B");
        assert_eq!(
            composed,
            "// Local Definition\nL\n// Local Definition End\n\nB"
        );
    }

    #[test]
    fn empty_body_is_dropped_too() {
        let composed = compose_sections("G", "", "   ");
        assert_eq!(composed, "// Global Definition\nG\n// Global Definition End");
    }
}
