//! CSV dialect configuration.
//!
//! This module defines the options controlling how CSV text is split into
//! records, shared by the loader and the raw snapshot writer.

/// Configuration for reading and writing CSV.
///
/// # Examples
///
/// ```
/// use drugraph::csv::CsvConfig;
///
/// let mut config = CsvConfig::new();
/// config.set_delimiter(b';').set_flexible(true);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvConfig {
    /// Delimiter to use for parsing the CSV
    pub(crate) delimiter: u8,
    /// Quote character
    pub(crate) quote: u8,
    /// Whether to trim whitespace
    pub(crate) trim: bool,
    /// Accept records whose field count differs from the header
    pub(crate) flexible: bool,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvConfig {
    /// Creates a new CSV configuration with default settings
    #[must_use]
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            trim: true,
            flexible: false,
        }
    }

    /// Sets the delimiter character
    pub fn set_delimiter(&mut self, delimiter: u8) -> &mut Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets the quote character
    pub fn set_quote(&mut self, quote: u8) -> &mut Self {
        self.quote = quote;
        self
    }

    /// Sets whether to trim whitespace from fields
    pub fn set_trim(&mut self, trim: bool) -> &mut Self {
        self.trim = trim;
        self
    }

    /// Sets whether records may have fewer or more fields than the header
    pub fn set_flexible(&mut self, flexible: bool) -> &mut Self {
        self.flexible = flexible;
        self
    }

    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.delimiter == b'\n' || self.delimiter == b'\r' {
            return Err("Delimiter cannot be a newline character".to_string());
        }
        if self.quote == b'\n' || self.quote == b'\r' {
            return Err("Quote cannot be a newline character".to_string());
        }
        if self.delimiter == self.quote {
            return Err(format!(
                "Delimiter and quote are both '{}'",
                self.delimiter as char
            ));
        }
        Ok(())
    }
}
