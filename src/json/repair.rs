//! Trailing-comma repair for hand-edited JSON exports.
//!
//! Only one defect is fixed: a comma followed by a newline and then the closing
//! `}` or `]` of the enclosing object or array. The comma and the newline are
//! removed. Anything else is left alone, and a document that still does not
//! parse after the substitution is rejected instead of being half-fixed.

use crate::error::{ParseError, ValueError};
use crate::utils::newline_delimiter_of;
use serde::de::IgnoredAny;

/// Result of a successful repair pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repair {
    /// The repaired, whitespace-trimmed document. Guaranteed to be valid JSON.
    pub text: String,
    /// Number of trailing commas removed
    pub fixes: usize,
}

impl Repair {
    /// Whether any trailing comma was removed.
    pub fn changed(&self) -> bool {
        self.fixes > 0
    }
}

/// Strip trailing commas that directly precede a closing delimiter on the next line.
///
/// The newline is the document's own (`\n` or `\r\n`).
///
/// # Errors
///
/// Returns a JSON `ParseError` if the document is still invalid after the
/// substitution. The error keeps the position reported by the JSON parser,
/// relative to the repaired text.
pub fn repair_trailing_commas(input: &str) -> Result<Repair, ParseError> {
    let newline = newline_delimiter_of(input);
    let mut text = input.trim().to_string();
    let mut fixes = 0;

    for close in ["}", "]"] {
        let pattern = format!(",{newline}{close}");
        let count = text.matches(pattern.as_str()).count();
        if count > 0 {
            fixes += count;
            text = text.replace(pattern.as_str(), close);
        }
    }

    if let Err(e) = serde_json::from_str::<IgnoredAny>(&text) {
        let reason = e.to_string();
        let mut err = ParseError::from(e);
        err.error = ValueError::Syntax(format!(
            "document is still invalid after trailing-comma repair ({fixes} fix(es) applied): {reason}"
        ));
        return Err(err);
    }

    Ok(Repair { text, fixes })
}
