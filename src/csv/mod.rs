//! CSV format loader implementation.
//!
//! This module loads CSV documents into [`Table`]s and writes tables back out as CSV.
//!
//! # Example
//!
//! ```
//! use drugraph::{TableLoader, csv::CsvLoader};
//!
//! let input = "id,scientific_title,date\nNCT01,Use of Diphenhydramine,1 January 2020";
//!
//! let table = CsvLoader::new().load(input).unwrap();
//! assert_eq!(table.get(0, "scientific_title"), Some("Use of Diphenhydramine"));
//! ```

mod config;
mod parse;
mod write;

use crate::TableLoader;
use crate::error::ParseError;
use crate::table::Table;
pub use config::CsvConfig;
use parse::csv_parse;
pub use write::write_csv;

/// Loader for CSV documents with a header line.
///
/// # Examples
///
/// With a custom dialect:
/// ```
/// use drugraph::csv::{CsvConfig, CsvLoader};
/// use drugraph::TableLoader;
///
/// let mut config = CsvConfig::new();
/// config.set_delimiter(b';');
///
/// let table = CsvLoader::with_config(config).load("atccode;drug\nA01AD;EPINEPHRINE").unwrap();
/// assert_eq!(table.get(0, "drug"), Some("EPINEPHRINE"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CsvLoader {
    config: CsvConfig,
}

impl CsvLoader {
    /// Creates a new CSV loader with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new CSV loader with custom configuration
    #[must_use]
    pub fn with_config(config: CsvConfig) -> Self {
        Self { config }
    }

    /// Gets a reference to the current configuration
    pub fn config(&self) -> &CsvConfig {
        &self.config
    }

    /// Gets a mutable reference to the current configuration
    pub fn config_mut(&mut self) -> &mut CsvConfig {
        &mut self.config
    }
}

impl TableLoader for CsvLoader {
    /// Parses a string containing a CSV document.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` with the line number of the offending record for
    /// malformed records, and for an invalid dialect configuration.
    fn load(&self, input: &str) -> Result<Table, ParseError> {
        csv_parse(input, &self.config)
    }
}
