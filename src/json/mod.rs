//! JSON format loader implementation.
//!
//! Loads a JSON array of objects into a [`Table`]. The loader is strict; the
//! trailing-comma repair in [`repair_trailing_commas`] is a separate step that
//! works on the raw file text.
//!
//! # Example
//!
//! ```
//! use drugraph::{TableLoader, json::{JsonLoader, repair_trailing_commas}};
//!
//! let input = "[\n{\"id\": \"9\", \"title\": \"Gold nanoparticles\", \"date\": \"01/01/2020\"},\n]";
//! assert!(JsonLoader::new().load(input).is_err());
//!
//! let repaired = repair_trailing_commas(input).unwrap();
//! let table = JsonLoader::new().load(&repaired.text).unwrap();
//! assert_eq!(table.get(0, "title"), Some("Gold nanoparticles"));
//! ```

mod parse;
mod repair;

use crate::TableLoader;
use crate::error::ParseError;
use crate::table::Table;
pub use parse::json_parse;
pub use repair::{Repair, repair_trailing_commas};

/// Strict loader for JSON arrays of objects.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLoader;

impl JsonLoader {
    /// Creates a JSON loader
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl TableLoader for JsonLoader {
    /// Parses a string containing a JSON array of objects.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` with the parser's line and column for invalid JSON,
    /// and for documents that are not an array of objects.
    fn load(&self, input: &str) -> Result<Table, ParseError> {
        json_parse(input)
    }
}
