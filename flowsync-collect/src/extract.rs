//! Wrapper stripping and typed-source splitting.
//!
//! Template files carry their executable body inside an exported-function
//! wrapper so editors treat them as ordinary modules:
//!
//! ```text
//! export default async function parseInput(msg) {
//!     return msg;
//! }
//! ```
//!
//! [`strip_function_wrapper`] cuts the body out with a last-closing-brace
//! heuristic; [`split_typed_source`] does the same with a depth-aware brace
//! scan and additionally keeps the declarations that precede the wrapper.
//! The two strategies intentionally differ — see DESIGN.md.

use std::sync::OnceLock;

use regex::Regex;

/// One de-indentation unit: templates indent the wrapped body by four columns.
pub const INDENT_WIDTH: usize = 4;

const WRAPPER_PATTERN: &str = r"export\s+default\s+(?:async\s+)?function\s+[^(]*\([^)]*\)\s*\{";

fn wrapper_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(WRAPPER_PATTERN).expect("wrapper pattern compiles"))
}

/// The three segments of a typed template file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SplitSource {
    /// Declarations ahead of the wrapper, trimmed.
    pub local: String,
    /// The wrapped body, trimmed.
    pub body: String,
    /// Anything after the wrapper's closing brace, trimmed. Carried for
    /// diagnostics; never merged into a record.
    pub trailing: String,
}

/// Strip the exported-function wrapper from a template, if present.
///
/// Without a wrapper the text is returned unchanged (the file is assumed to
/// be body-only). With one, the body ends at the *last* `}` in the text —
/// a lexical heuristic, not a parser; content after the real closing brace
/// that contains a `}` of its own will be mistaken for body. The result is
/// trimmed and de-indented by one [`INDENT_WIDTH`] unit.
pub fn strip_function_wrapper(code: &str) -> String {
    let Some(found) = wrapper_regex().find(code) else {
        return code.to_owned();
    };

    let mut inner = &code[found.end()..];
    if let Some(last) = inner.rfind('}') {
        inner = &inner[..last];
    }

    unindent(inner.trim(), INDENT_WIDTH)
}

/// Split a typed template into declarations, body, and trailing text.
///
/// Without a wrapper the whole text is the body. With one, the body is
/// delimited by depth-aware brace counting from the wrapper's opening brace,
/// so nested object literals and blocks are handled correctly. Unbalanced
/// input runs the body to the end of the text.
pub fn split_typed_source(code: &str) -> SplitSource {
    let Some(found) = wrapper_regex().find(code) else {
        return SplitSource {
            body: code.trim().to_owned(),
            ..SplitSource::default()
        };
    };

    let local = code[..found.start()].trim().to_owned();
    let body_start = found.end();

    // Braces are ASCII, so a byte scan is slice-safe.
    let mut depth = 1usize;
    let mut close = None;
    for (offset, byte) in code[body_start..].bytes().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(body_start + offset);
                    break;
                }
            }
            _ => {}
        }
    }

    match close {
        Some(end) => SplitSource {
            local,
            body: code[body_start..end].trim().to_owned(),
            trailing: code[end + 1..].trim().to_owned(),
        },
        None => SplitSource {
            local,
            body: code[body_start..].trim().to_owned(),
            trailing: String::new(),
        },
    }
}

/// Remove one exact leading-indent unit from every line.
///
/// Lines that do not start with the full prefix pass through unchanged.
pub fn unindent(code: &str, columns: usize) -> String {
    let prefix = " ".repeat(columns);
    code.split('\n')
        .map(|line| line.strip_prefix(prefix.as_str()).unwrap_or(line))
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
