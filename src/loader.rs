//! File-level loading of the source datasets.
//!
//! [`Loader`] reads files through a [`Storage`] and hands the text to the CSV
//! or JSON table loaders. The PubMed JSON export is repaired in place before
//! it is parsed.

use crate::TableLoader;
use crate::config::PipelineConfig;
use crate::csv::{CsvConfig, CsvLoader};
use crate::error::PipelineError;
use crate::json::{JsonLoader, Repair, repair_trailing_commas};
use crate::storage::Storage;
use crate::table::Table;
use std::path::Path;

/// The four source tables, as loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceTables {
    pub drugs: Table,
    pub pubmed_csv: Table,
    pub pubmed_json: Table,
    pub clinical_trials: Table,
}

/// Reads source files into tables.
pub struct Loader<'s> {
    storage: &'s dyn Storage,
    csv: CsvLoader,
    json: JsonLoader,
}

impl<'s> Loader<'s> {
    pub fn new(storage: &'s dyn Storage) -> Self {
        Self {
            storage,
            csv: CsvLoader::new(),
            json: JsonLoader::new(),
        }
    }

    /// Use a custom CSV dialect for every CSV source.
    #[must_use]
    pub fn with_csv_config(mut self, config: CsvConfig) -> Self {
        self.csv = CsvLoader::with_config(config);
        self
    }

    fn read(&self, path: &Path) -> Result<String, PipelineError> {
        self.storage
            .read_to_string(path)
            .map_err(|e| PipelineError::io(path, e))
    }

    /// Load a CSV file.
    pub fn load_csv(&self, path: &Path) -> Result<Table, PipelineError> {
        let table = self.csv.load(&self.read(path)?)?;
        log::info!("{} loaded ({} rows)", display_name(path), table.len());
        Ok(table)
    }

    /// Load a JSON file without repairing it.
    pub fn load_json(&self, path: &Path) -> Result<Table, PipelineError> {
        let table = self.json.load(&self.read(path)?)?;
        log::info!("{} loaded ({} rows)", display_name(path), table.len());
        Ok(table)
    }

    /// Remove trailing commas from a JSON file, rewriting it only if something changed.
    ///
    /// A file the repair cannot turn into valid JSON is left untouched.
    pub fn clean_json(&self, path: &Path) -> Result<Repair, PipelineError> {
        let repair = repair_trailing_commas(&self.read(path)?)?;
        if repair.changed() {
            self.storage
                .write(path, repair.text.as_bytes())
                .map_err(|e| PipelineError::io(path, e))?;
            log::info!(
                "{} cleaned ({} trailing comma(s) removed)",
                path.display(),
                repair.fixes
            );
        }
        Ok(repair)
    }

    /// Clean a JSON file in place, then load it.
    pub fn clean_and_load_json(&self, path: &Path) -> Result<Table, PipelineError> {
        let repair = self.clean_json(path)?;
        let table = self.json.load(&repair.text)?;
        log::info!("{} loaded ({} rows)", display_name(path), table.len());
        Ok(table)
    }

    /// Load all four configured sources.
    pub fn load_all(&self, config: &PipelineConfig) -> Result<SourceTables, PipelineError> {
        Ok(SourceTables {
            drugs: self.load_csv(&config.drugs_path)?,
            pubmed_csv: self.load_csv(&config.pubmed_csv_path)?,
            pubmed_json: self.clean_and_load_json(&config.pubmed_json_path)?,
            clinical_trials: self.load_csv(&config.clinical_trials_path)?,
        })
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;
    use crate::storage::MemoryStorage;
    use pretty_assertions::assert_eq;

    const BROKEN_JSON: &str = "[\n{\"id\": \"1\", \"title\": \"A\", \"date\": \"2020-01-01\"},\n]";

    #[test]
    fn test_load_csv() {
        let storage = MemoryStorage::new().with_file("drugs.csv", "atccode,drug\nA04AD,DIPHENHYDRAMINE\n");
        let table = Loader::new(&storage).load_csv(Path::new("drugs.csv")).unwrap();
        assert_eq!(table.get(0, "drug"), Some("DIPHENHYDRAMINE"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let storage = MemoryStorage::new();
        let err = Loader::new(&storage).load_csv(Path::new("drugs.csv")).unwrap_err();
        assert!(matches!(err, PipelineError::Io { ref path, .. } if path == Path::new("drugs.csv")));
    }

    #[test]
    fn test_clean_json_rewrites_file() {
        let storage = MemoryStorage::new().with_file("pubmed.json", BROKEN_JSON);
        let loader = Loader::new(&storage);

        let repair = loader.clean_json(Path::new("pubmed.json")).unwrap();
        assert_eq!(repair.fixes, 1);
        let on_disk = storage.read_to_string(Path::new("pubmed.json")).unwrap();
        assert_eq!(on_disk, repair.text);

        // the file is now valid, so a strict load works
        let table = loader.load_json(Path::new("pubmed.json")).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_load_json_is_strict() {
        let storage = MemoryStorage::new().with_file("pubmed.json", BROKEN_JSON);
        let loader = Loader::new(&storage);

        let err = loader.load_json(Path::new("pubmed.json")).unwrap_err();
        assert!(matches!(err, PipelineError::Parse(ParseError { line: Some(3), .. })));
        assert_eq!(storage.read_to_string(Path::new("pubmed.json")).unwrap(), BROKEN_JSON);

        let table = loader.clean_and_load_json(Path::new("pubmed.json")).unwrap();
        assert_eq!(table.get(0, "title"), Some("A"));
    }

    #[test]
    fn test_clean_json_leaves_unrepairable_file_untouched() {
        let broken = "[\n  {\"id\": \"1\",\n  }\n]";
        let storage = MemoryStorage::new().with_file("pubmed.json", broken);
        let err = Loader::new(&storage)
            .clean_and_load_json(Path::new("pubmed.json"))
            .unwrap_err();
        assert!(matches!(err, PipelineError::Parse(ParseError { .. })));
        assert_eq!(storage.read_to_string(Path::new("pubmed.json")).unwrap(), broken);
    }

    #[test]
    fn test_load_all() {
        let storage = MemoryStorage::new()
            .with_file("data/drugs.csv", "atccode,drug\nA04AD,DIPHENHYDRAMINE\n")
            .with_file("data/pubmed.csv", "id,title,date,journal\n1,A,01/01/2019,J\n")
            .with_file("data/pubmed.json", BROKEN_JSON)
            .with_file(
                "data/clinical_trials.csv",
                "id,scientific_title,date,journal\nNCT01,B,1 January 2020,J\n",
            );
        let config = PipelineConfig::new(
            "data/drugs.csv",
            "data/pubmed.csv",
            "data/pubmed.json",
            "data/clinical_trials.csv",
        );

        let tables = Loader::new(&storage).load_all(&config).unwrap();
        assert_eq!(tables.drugs.len(), 1);
        assert_eq!(tables.pubmed_csv.len(), 1);
        assert_eq!(tables.pubmed_json.len(), 1);
        assert_eq!(tables.clinical_trials.get(0, "scientific_title"), Some("B"));
    }
}
