//! Date normalization and PubMed table consolidation.
//!
//! Source datasets spell dates in several ways (`2020-01-01`, `25/05/2020`,
//! `1 January 2020`, ...). Before publications are linked, every value of a
//! table's date column is parsed and re-emitted in one [`DateFormat`].
//!
//! # Example
//!
//! ```
//! use drugraph::normalize::normalize_date;
//! use drugraph::DateFormat;
//!
//! assert_eq!(normalize_date("2021-03-05", DateFormat::DayMonthYear).unwrap(), "05/03/2021");
//! assert_eq!(normalize_date("1 January 2020", DateFormat::YearMonthDay).unwrap(), "2020-01-01");
//! ```

use crate::DataFormat;
use crate::error::{ParseError, ValueError, fields};
use crate::table::Table;
use crate::utils::parse_date;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Canonical textual date formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateFormat {
    /// `DD/MM/YYYY`
    #[default]
    DayMonthYear,
    /// `YYYY-MM-DD`
    YearMonthDay,
}

impl DateFormat {
    /// The chrono format string for this format.
    pub fn pattern(&self) -> &'static str {
        match self {
            DateFormat::DayMonthYear => "%d/%m/%Y",
            DateFormat::YearMonthDay => "%Y-%m-%d",
        }
    }

    /// Render a date in this format.
    pub fn format(&self, date: NaiveDate) -> String {
        date.format(self.pattern()).to_string()
    }
}

/// Parse `value` and render it in `format`.
///
/// # Errors
///
/// Returns [`ValueError::BadValue`] if `value` is not a recognized date.
pub fn normalize_date(value: &str, format: DateFormat) -> Result<String, ValueError> {
    parse_date(value)
        .map(|date| format.format(date))
        .ok_or_else(|| ValueError::BadValue {
            field: fields::DATE,
            key: fields::DATE.to_string(),
            value: value.to_string(),
            reason: "not a recognized date".to_string(),
        })
}

/// Normalize every value of `column` in place.
///
/// The step is skipped, returning `Ok(false)`, when the table has no such column.
/// `source_format` only labels errors with the format the table was loaded from;
/// their line is the 1-based row number within the table.
///
/// # Errors
///
/// A missing or unparseable cell aborts normalization; the table may then be
/// partially rewritten.
pub fn normalize_dates(
    table: &mut Table,
    column: &str,
    format: DateFormat,
    source_format: DataFormat,
) -> Result<bool, ParseError> {
    let normalized = table.try_map_column(column, |index, value| {
        let error = |e| ParseError::at_line(index + 1, source_format, e);
        let value = value.ok_or_else(|| {
            error(ValueError::MissingValue {
                field: fields::DATE,
                key: column.to_string(),
            })
        })?;
        normalize_date(value, format).map(Some).map_err(error)
    })?;

    if normalized {
        log::debug!("normalized {} date(s) in column '{column}' to {}", table.len(), format.pattern());
    } else {
        log::debug!("no '{column}' column, dates left as-is");
    }
    Ok(normalized)
}

/// Merge PubMed tables loaded from independent sources.
///
/// Rows are concatenated in argument order, exact full-row duplicates are
/// removed (first occurrence wins) and the index is dense and 0-based.
pub fn merge_tables<I>(tables: I) -> Table
where
    I: IntoIterator<Item = Table>,
{
    let mut merged = Table::concat(tables);
    let removed = merged.drop_duplicates();
    log::debug!("merged {} row(s), dropped {removed} duplicate(s)", merged.len());
    merged
}
