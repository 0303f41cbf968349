//! The fixed task graph.
//!
//! Three independent ingest chains (load, then save a raw CSV snapshot) for
//! clinical trials, PubMed and drugs converge into one reconciliation task:
//!
//! ```text
//! load_clinical_trials -> save_clinical_trials_raw --\
//! load_pubmed          -> save_pubmed_raw          ----> reconcile
//! load_drugs           -> save_drugs_raw           --/
//! ```
//!
//! Tasks hand their results to downstream tasks as plain values. Each task is
//! retried according to [`PipelineConfig::retries`].

use crate::config::PipelineConfig;
use crate::csv::{CsvConfig, write_csv};
use crate::error::PipelineError;
use crate::loader::Loader;
use crate::matcher::Matcher;
use crate::normalize::{DateFormat, merge_tables, normalize_dates};
use crate::retry::retry_task;
use crate::schema::FieldMap;
use crate::storage::Storage;
use crate::table::Table;
use crate::writer::write_graph;
use crate::{DataFormat, LinkRecord, SourceKind, error::fields};
use std::fmt;
use std::path::{Path, PathBuf};

/// Identifier of a task in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskId {
    LoadClinicalTrials,
    SaveClinicalTrialsRaw,
    LoadPubmed,
    SavePubmedRaw,
    LoadDrugs,
    SaveDrugsRaw,
    Reconcile,
}

impl TaskId {
    /// Every task, in execution order.
    pub const ALL: [TaskId; 7] = [
        TaskId::LoadClinicalTrials,
        TaskId::SaveClinicalTrialsRaw,
        TaskId::LoadPubmed,
        TaskId::SavePubmedRaw,
        TaskId::LoadDrugs,
        TaskId::SaveDrugsRaw,
        TaskId::Reconcile,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::LoadClinicalTrials => "load_clinical_trials",
            Self::SaveClinicalTrialsRaw => "save_clinical_trials_raw",
            Self::LoadPubmed => "load_pubmed",
            Self::SavePubmedRaw => "save_pubmed_raw",
            Self::LoadDrugs => "load_drugs",
            Self::SaveDrugsRaw => "save_drugs_raw",
            Self::Reconcile => "reconcile",
        }
    }

    /// Tasks that must finish before this one starts.
    pub fn upstream(self) -> &'static [TaskId] {
        match self {
            Self::LoadClinicalTrials | Self::LoadPubmed | Self::LoadDrugs => &[],
            Self::SaveClinicalTrialsRaw => &[Self::LoadClinicalTrials],
            Self::SavePubmedRaw => &[Self::LoadPubmed],
            Self::SaveDrugsRaw => &[Self::LoadDrugs],
            Self::Reconcile => &[
                Self::SaveClinicalTrialsRaw,
                Self::SavePubmedRaw,
                Self::SaveDrugsRaw,
            ],
        }
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub clinical_trials: usize,
    pub pubmed: usize,
    pub drugs: usize,
    pub links: usize,
    pub output_path: PathBuf,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} clinical trial(s), {} pubmed article(s), {} drug(s) -> {} link(s) in {}",
            self.clinical_trials,
            self.pubmed,
            self.drugs,
            self.links,
            self.output_path.display()
        )
    }
}

/// Runs the task graph against a storage backend.
pub struct Pipeline<'s> {
    config: PipelineConfig,
    storage: &'s dyn Storage,
    csv: CsvConfig,
    fields: FieldMap,
}

impl<'s> Pipeline<'s> {
    pub fn new(config: PipelineConfig, storage: &'s dyn Storage) -> Self {
        Self {
            config,
            storage,
            csv: CsvConfig::new(),
            fields: FieldMap::new(),
        }
    }

    /// Use a custom CSV dialect for reading sources and writing snapshots.
    #[must_use]
    pub fn with_csv_config(mut self, csv: CsvConfig) -> Self {
        self.csv = csv;
        self
    }

    /// Use custom column aliases when building records.
    #[must_use]
    pub fn with_field_map(mut self, fields: FieldMap) -> Self {
        self.fields = fields;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn loader(&self) -> Loader<'s> {
        Loader::new(self.storage).with_csv_config(self.csv.clone())
    }

    fn run_task<T>(
        &self,
        task: TaskId,
        f: impl FnMut() -> Result<T, PipelineError>,
    ) -> Result<T, PipelineError> {
        log::info!("running {task}");
        retry_task(task, self.config.retries, self.config.retry_delay(), f)
    }

    /// Execute every task once, in dependency order.
    pub fn run(&self) -> Result<RunSummary, PipelineError> {
        let clinical_trials = self.run_task(TaskId::LoadClinicalTrials, || self.load_clinical_trials())?;
        self.run_task(TaskId::SaveClinicalTrialsRaw, || {
            self.save_raw(&clinical_trials, "clinical_trials_raw.csv")
        })?;

        let pubmed = self.run_task(TaskId::LoadPubmed, || self.load_pubmed())?;
        self.run_task(TaskId::SavePubmedRaw, || self.save_raw(&pubmed, "pubmed_raw.csv"))?;

        let drugs = self.run_task(TaskId::LoadDrugs, || self.load_drugs())?;
        self.run_task(TaskId::SaveDrugsRaw, || self.save_raw(&drugs, "drugs_raw.csv"))?;

        let links = self.run_task(TaskId::Reconcile, || {
            self.reconcile(&clinical_trials, &pubmed, &drugs)
        })?;

        Ok(RunSummary {
            clinical_trials: clinical_trials.len(),
            pubmed: pubmed.len(),
            drugs: drugs.len(),
            links: links.len(),
            output_path: self.config.output_path.clone(),
        })
    }

    /// Load the clinical trials and normalize their dates.
    pub fn load_clinical_trials(&self) -> Result<Table, PipelineError> {
        let mut table = self.loader().load_csv(&self.config.clinical_trials_path)?;
        normalize_dates(
            &mut table,
            fields::DATE,
            self.config.dates.clinical_trials,
            DataFormat::Csv,
        )?;
        Ok(table)
    }

    /// Load, merge and normalize both PubMed exports.
    pub fn load_pubmed(&self) -> Result<Table, PipelineError> {
        self.merged_pubmed(self.config.dates.pubmed)
    }

    fn merged_pubmed(&self, format: DateFormat) -> Result<Table, PipelineError> {
        let loader = self.loader();
        let csv = loader.load_csv(&self.config.pubmed_csv_path)?;
        let json = loader.clean_and_load_json(&self.config.pubmed_json_path)?;
        let mut table = merge_tables([csv, json]);
        normalize_dates(&mut table, fields::DATE, format, DataFormat::Csv)?;
        Ok(table)
    }

    /// Load the drug list.
    pub fn load_drugs(&self) -> Result<Table, PipelineError> {
        self.loader().load_csv(&self.config.drugs_path)
    }

    /// Write a raw snapshot of a table to `<raw_dir>/<file_name>`.
    pub fn save_raw(&self, table: &Table, file_name: &str) -> Result<PathBuf, PipelineError> {
        let path = self.config.raw_dir.join(file_name);
        self.write_table(table, &path)?;
        Ok(path)
    }

    fn write_table(&self, table: &Table, path: &Path) -> Result<(), PipelineError> {
        let bytes = write_csv(table, &self.csv)?;
        self.storage
            .write(path, &bytes)
            .map_err(|e| PipelineError::io(path, e))?;
        log::info!("saved {} row(s) to {}", table.len(), path.display());
        Ok(())
    }

    /// Build typed records, link them and write the graph.
    pub fn reconcile(
        &self,
        clinical_trials: &Table,
        pubmed: &Table,
        drugs: &Table,
    ) -> Result<Vec<LinkRecord>, PipelineError> {
        let trials = self.fields.publications_from_table(
            clinical_trials,
            SourceKind::ClinicalTrial,
            DataFormat::Csv,
        )?;
        let articles = self
            .fields
            .publications_from_table(pubmed, SourceKind::Pubmed, DataFormat::Csv)?;
        let drugs = self.fields.drugs_from_table(drugs, DataFormat::Csv)?;

        let links = Matcher::new()
            .with_config(self.config.matcher)
            .reconcile(&trials, &articles, &drugs);
        write_graph(self.storage, &self.config.output_path, &links)?;
        Ok(links)
    }

    /// Merge both PubMed exports into one CSV at `consolidated_path`.
    ///
    /// Dates are written in the consolidation format, which by default differs
    /// from the one the `load_pubmed` task produces.
    pub fn consolidate_pubmed(&self) -> Result<Table, PipelineError> {
        let table = self.merged_pubmed(self.config.dates.consolidated)?;
        self.write_table(&table, &self.config.consolidated_path)?;
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use pretty_assertions::assert_eq;

    fn storage() -> MemoryStorage {
        MemoryStorage::new()
            .with_file("data/drugs.csv", "atccode,drug\nA04AD,DIPHENHYDRAMINE\nS03AA,TETRACYCLINE\n")
            .with_file(
                "data/pubmed.csv",
                "id,title,date,journal\n1,Tetracycline resistance,01/01/2019,J1\n2,Nothing relevant,2020-01-01,J2\n",
            )
            .with_file(
                "data/pubmed.json",
                "[\n{\"id\": \"1\", \"title\": \"Tetracycline resistance\", \"date\": \"01/01/2019\", \"journal\": \"J1\"},\n]",
            )
            .with_file(
                "data/clinical_trials.csv",
                "id,scientific_title,date,journal\nNCT01,Use of Diphenhydramine,1 January 2020,J3\n",
            )
    }

    fn config() -> PipelineConfig {
        PipelineConfig::new(
            "data/drugs.csv",
            "data/pubmed.csv",
            "data/pubmed.json",
            "data/clinical_trials.csv",
        )
    }

    #[test]
    fn test_task_graph_shape() {
        for (position, task) in TaskId::ALL.iter().enumerate() {
            for upstream in task.upstream() {
                let upstream_position = TaskId::ALL.iter().position(|t| t == upstream).unwrap();
                assert!(upstream_position < position, "{upstream} must run before {task}");
            }
        }
        assert_eq!(TaskId::Reconcile.upstream().len(), 3);
        assert_eq!(TaskId::SavePubmedRaw.to_string(), "save_pubmed_raw");
    }

    #[test]
    fn test_run_writes_graph_and_snapshots() {
        let storage = storage();
        let summary = Pipeline::new(config(), &storage).run().unwrap();

        assert_eq!(
            summary,
            RunSummary {
                clinical_trials: 1,
                pubmed: 2,
                drugs: 2,
                links: 2,
                output_path: PathBuf::from("dags/output/graph.json"),
            }
        );

        let graph: Vec<LinkRecord> =
            serde_json::from_slice(&storage.read(Path::new("dags/output/graph.json")).unwrap()).unwrap();
        assert_eq!(graph[0].drug, "DIPHENHYDRAMINE");
        assert_eq!(graph[0].date, "01/01/2020");
        assert_eq!(graph[0].source, SourceKind::ClinicalTrial);
        assert_eq!(graph[1].drug, "TETRACYCLINE");
        assert_eq!(graph[1].date, "2019-01-01");
        assert_eq!(graph[1].source, SourceKind::Pubmed);

        for raw in ["clinical_trials_raw.csv", "pubmed_raw.csv", "drugs_raw.csv"] {
            assert!(storage.read(&Path::new("dags/raw").join(raw)).is_ok(), "{raw} missing");
        }
    }

    #[test]
    fn test_consolidate_pubmed() {
        let storage = storage();
        let table = Pipeline::new(config(), &storage).consolidate_pubmed().unwrap();
        assert_eq!(table.len(), 2);

        let written = storage.read_to_string(Path::new("data/pubmed_.csv")).unwrap();
        assert_eq!(
            written,
            "id,title,date,journal\n1,Tetracycline resistance,01/01/2019,J1\n2,Nothing relevant,01/01/2020,J2\n"
        );
    }

    #[test]
    fn test_missing_source_fails_named_task() {
        let storage = MemoryStorage::new();
        let err = Pipeline::new(config(), &storage).run().unwrap_err();
        assert!(matches!(
            err,
            PipelineError::TaskFailed { task: TaskId::LoadClinicalTrials, attempts: 2, .. }
        ));
    }
}
