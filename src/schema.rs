//! Column-to-field mapping and typed record extraction.
//!
//! Source files name the same field differently (`title` in PubMed exports,
//! `scientific_title` in clinical trials). A [`FieldMap`] resolves a record
//! field to whichever column a table actually has, then builds
//! [`DrugRecord`]s and [`PublicationRecord`]s from the table rows.

use crate::DataFormat;
use crate::error::{ParseError, ValueError, fields};
use crate::table::Table;
use crate::{DrugRecord, PublicationRecord, SourceKind};
use std::collections::HashMap;

/// Default column aliases for each record field
pub(crate) const DEFAULT_FIELDS: &[(&str, &[&str])] = &[
    (fields::ID, &["id"]),
    (fields::TITLE, &["title", "scientific_title"]),
    (fields::DATE, &["date"]),
    (fields::JOURNAL, &["journal"]),
    (fields::DRUG, &["drug", "name"]),
    (fields::ATCCODE, &["atccode"]),
];

/// Maps record fields to column names.
///
/// Column lookups ignore case. Aliases are tried in declaration order, so the
/// first alias a table has wins.
///
/// # Examples
///
/// ```
/// use drugraph::schema::FieldMap;
/// use drugraph::Table;
///
/// let mut map = FieldMap::new();
/// map.add_field_aliases("title", vec!["public_title".to_string()]);
///
/// let table = Table::new(["id", "Public_Title", "date"]);
/// assert_eq!(map.column_for(&table, "title"), Some(1));
/// ```
#[derive(Debug, Clone)]
pub struct FieldMap {
    /// Aliases for each field
    pub(crate) field_map: HashMap<String, Vec<String>>,
}

impl Default for FieldMap {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldMap {
    /// Creates a field map with the default aliases
    #[must_use]
    pub fn new() -> Self {
        let field_map = DEFAULT_FIELDS
            .iter()
            .map(|(field, aliases)| {
                (
                    field.to_string(),
                    aliases.iter().map(|s| s.to_string()).collect(),
                )
            })
            .collect();
        Self { field_map }
    }

    /// Replaces the aliases of a field
    pub fn set_field_aliases(&mut self, field: &str, aliases: Vec<String>) -> &mut Self {
        self.field_map.insert(field.to_string(), aliases);
        self
    }

    /// Adds aliases to a field, after the existing ones
    pub fn add_field_aliases(&mut self, field: &str, aliases: Vec<String>) -> &mut Self {
        self.field_map
            .entry(field.to_string())
            .or_default()
            .extend(aliases);
        self
    }

    /// Position of the first column of `table` matching one of `field`'s aliases
    pub fn column_for(&self, table: &Table, field: &str) -> Option<usize> {
        self.field_map
            .get(field)?
            .iter()
            .find_map(|alias| table.column_index_ignore_case(alias))
    }

    /// Validates the mapping
    pub fn validate(&self) -> Result<(), String> {
        for (field, aliases) in &self.field_map {
            if field.is_empty() {
                return Err("Empty field name found in mappings".to_string());
            }
            if aliases.is_empty() {
                return Err(format!("Field '{}' has no aliases defined", field));
            }
            if aliases.iter().any(String::is_empty) {
                return Err(format!("Empty alias found for field '{}'", field));
            }
        }

        for required in [fields::TITLE, fields::DATE, fields::DRUG] {
            if !self.field_map.contains_key(required) {
                return Err(format!("Required field '{}' has no mapping", required));
            }
        }

        // Check for duplicate aliases across different fields
        let mut all_aliases = HashMap::new();
        for (field, aliases) in &self.field_map {
            for alias in aliases {
                let alias_lower = alias.to_lowercase();
                if let Some(existing_field) = all_aliases.get(&alias_lower)
                    && existing_field != field
                {
                    return Err(format!(
                        "Alias '{}' is mapped to both '{}' and '{}'",
                        alias, existing_field, field
                    ));
                }
                all_aliases.insert(alias_lower, field.clone());
            }
        }

        Ok(())
    }

    fn require_column(
        &self,
        table: &Table,
        field: &'static str,
        format: DataFormat,
    ) -> Result<usize, ParseError> {
        self.column_for(table, field).ok_or_else(|| {
            ParseError::without_position(format, ValueError::MissingColumn { field })
        })
    }

    /// Build drug records from a drug list table.
    ///
    /// Missing drug names become empty names; the matcher decides what to do with them.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::MissingColumn`] if the table has no drug column.
    pub fn drugs_from_table(
        &self,
        table: &Table,
        format: DataFormat,
    ) -> Result<Vec<DrugRecord>, ParseError> {
        let name = self.require_column(table, fields::DRUG, format)?;
        let atccode = self.column_for(table, fields::ATCCODE);

        Ok(table
            .rows()
            .iter()
            .map(|row| DrugRecord {
                name: row[name].as_deref().unwrap_or_default().into(),
                atccode: atccode.and_then(|i| row[i].as_deref()).map(Into::into),
            })
            .collect())
    }

    /// Build publication records of one source kind.
    ///
    /// A missing title becomes an empty title, which links to nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::MissingColumn`] if the title or date column is
    /// absent, and [`ValueError::MissingValue`] for a row without a date.
    pub fn publications_from_table(
        &self,
        table: &Table,
        source_kind: SourceKind,
        format: DataFormat,
    ) -> Result<Vec<PublicationRecord>, ParseError> {
        let title = self.require_column(table, fields::TITLE, format)?;
        let date = self.require_column(table, fields::DATE, format)?;
        let id = self.column_for(table, fields::ID);
        let journal = self.column_for(table, fields::JOURNAL);

        table
            .iter_indexed()
            .map(|(index, row)| {
                let date_value = row[date].clone().ok_or_else(|| {
                    ParseError::at_line(
                        index + 1,
                        format,
                        ValueError::MissingValue {
                            field: fields::DATE,
                            key: table.columns()[date].clone(),
                        },
                    )
                })?;
                Ok(PublicationRecord {
                    id: id.and_then(|i| row[i].clone()),
                    title: row[title].clone().unwrap_or_default(),
                    date: date_value,
                    journal: journal.and_then(|i| row[i].clone()),
                    source_kind,
                })
            })
            .collect()
    }
}
