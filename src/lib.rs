//! Link drug mentions to clinical trials and PubMed publications.
//!
//! `drugraph` loads three small datasets (drug names, clinical trials and PubMed
//! publications), normalizes their dates, and emits one [`LinkRecord`] for every
//! publication title that mentions a known drug.
//!
//! # Features
//!
//! - `parallel` - Evaluate the matcher on a rayon pool (enabled by default)
//! - `regex` - Use the `regex` crate for date recognition (enabled by default)
//! - `lite` - Use `regex-lite` instead, for smaller binaries
//!
//! # Key Characteristics
//!
//! - **Tabular loading**: CSV and JSON array-of-objects sources are loaded into a
//!   [`Table`] with columns preserved by name. The JSON loader can repair the one
//!   trailing-comma defect found in exported PubMed files.
//! - **Date normalization**: heterogeneous date spellings are rewritten into one
//!   canonical [`DateFormat`] per dataset.
//! - **Linking**: a drug is linked to a publication when its lower-cased name is a
//!   substring of the lower-cased title. Nothing smarter than that.
//!
//! # Basic Usage
//!
//! ```rust
//! use drugraph::{DrugRecord, Matcher, PublicationRecord, SourceKind};
//!
//! let drugs = vec![DrugRecord::new("aspirin"), DrugRecord::new("ibuprofen")];
//! let trials = vec![PublicationRecord::new(
//!     "Effect of ASPIRIN on headache",
//!     "2020-01-01",
//!     SourceKind::ClinicalTrial,
//! )];
//!
//! let links = Matcher::new().reconcile(&trials, &[], &drugs);
//! assert_eq!(links.len(), 1);
//! assert_eq!(links[0].drug, "aspirin");
//! assert_eq!(links[0].date, "2020-01-01");
//! ```
//!
//! # Loading Tables
//!
//! ```rust
//! use drugraph::{TableLoader, csv::CsvLoader, json::JsonLoader};
//!
//! let csv = CsvLoader::new().load("atccode,drug\nA04AD,DIPHENHYDRAMINE").unwrap();
//! assert_eq!(csv.get(0, "drug"), Some("DIPHENHYDRAMINE"));
//!
//! let json = JsonLoader::new().load(r#"[{"id": 9, "title": "Gold nanoparticles"}]"#).unwrap();
//! assert_eq!(json.get(0, "id"), Some("9"));
//! ```
//!
//! # Running the Pipeline
//!
//! The [`pipeline::Pipeline`] runs the fixed task graph (three load→save-raw
//! chains followed by reconciliation) against any [`storage::Storage`]
//! implementation. The `drugraph` binary wires it to the filesystem and a YAML
//! configuration file.
//!
//! # Error Handling
//!
//! Loading and conversion failures are reported as [`ParseError`] values with the
//! source format and, where known, a line and column. Pipeline steps wrap them in
//! [`PipelineError`].

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

pub mod config;
pub mod csv;
pub mod error;
pub mod json;
pub mod loader;
pub mod logging;
pub mod matcher;
pub mod normalize;
pub mod pipeline;
pub mod retry;
pub mod schema;
pub mod storage;
pub mod table;
pub mod writer;

// Reexports
pub use config::PipelineConfig;
pub use error::{ParseError, PipelineError, ValueError};
pub use matcher::{Matcher, MatcherConfig, mentions};
pub use normalize::DateFormat;
pub use table::Table;

mod regex;
mod utils;

/// Data formats handled by the loaders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Csv,
    Json,
    Yaml,
}

impl DataFormat {
    /// Convert the format to a string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataFormat::Csv => "CSV",
            DataFormat::Json => "JSON",
            DataFormat::Yaml => "YAML",
        }
    }
}

impl std::fmt::Display for DataFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The dataset a publication came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    ClinicalTrial,
    Pubmed,
}

impl SourceKind {
    /// Provenance tag written to the output graph.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::ClinicalTrial => "clinical_trial",
            SourceKind::Pubmed => "pubmed",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A known drug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrugRecord {
    /// Drug name as written in the source list
    pub name: CompactString,
    /// ATC classification code, when the source carries one
    pub atccode: Option<CompactString>,
}

impl DrugRecord {
    /// Create a drug record without an ATC code.
    pub fn new(name: impl Into<CompactString>) -> Self {
        Self {
            name: name.into(),
            atccode: None,
        }
    }
}

/// A clinical trial or PubMed publication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationRecord {
    /// Source identifier (NCT number or PubMed id)
    pub id: Option<String>,
    /// Title of the publication; `scientific_title` for clinical trials
    pub title: String,
    /// Publication date, already normalized to the dataset's canonical format
    pub date: String,
    /// Journal name
    pub journal: Option<String>,
    /// Dataset the publication came from
    pub source_kind: SourceKind,
}

impl PublicationRecord {
    /// Create a publication record without id or journal.
    pub fn new(title: impl Into<String>, date: impl Into<String>, source_kind: SourceKind) -> Self {
        Self {
            id: None,
            title: title.into(),
            date: date.into(),
            journal: None,
            source_kind,
        }
    }
}

/// An output record asserting a drug was mentioned in a publication's title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// Drug name as written in the drug list
    pub drug: CompactString,
    /// Title of the publication
    pub publication: String,
    /// Publication date as a string
    pub date: String,
    /// Dataset the publication came from
    pub source: SourceKind,
}

/// Trait for implementing table loaders.
pub trait TableLoader {
    /// Parse a string containing one tabular document.
    ///
    /// # Arguments
    ///
    /// * `input` - The document text
    ///
    /// # Returns
    ///
    /// A Result containing the loaded [`Table`] or a ParseError
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the input is malformed
    fn load(&self, input: &str) -> std::result::Result<Table, ParseError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_source_kind_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&SourceKind::ClinicalTrial).unwrap(),
            "\"clinical_trial\""
        );
        assert_eq!(serde_json::to_string(&SourceKind::Pubmed).unwrap(), "\"pubmed\"");
    }

    #[test]
    fn test_link_record_field_order() {
        let link = LinkRecord {
            drug: "BETAMETHASONE".into(),
            publication: "Hemodynamic effects of betamethasone".to_string(),
            date: "01/01/2020".to_string(),
            source: SourceKind::Pubmed,
        };
        assert_eq!(
            serde_json::to_string(&link).unwrap(),
            r#"{"drug":"BETAMETHASONE","publication":"Hemodynamic effects of betamethasone","date":"01/01/2020","source":"pubmed"}"#
        );
    }

    #[test]
    fn test_data_format_display() {
        assert_eq!(format!("{}", DataFormat::Csv), "CSV");
        assert_eq!(format!("{}", DataFormat::Json), "JSON");
        assert_eq!(format!("{}", DataFormat::Yaml), "YAML");
    }
}
