//! Drug mention linking.
//!
//! A drug is mentioned by a publication when its lower-cased name is a
//! substring of the lower-cased title. There is no tokenization: "aspirin"
//! is found in "disaspirine tablets".
//!
//! # Example
//!
//! ```
//! use drugraph::matcher::{Matcher, MatcherConfig};
//! use drugraph::{DrugRecord, PublicationRecord, SourceKind};
//!
//! let drugs = vec![DrugRecord::new("TETRACYCLINE"), DrugRecord::new("ETHANOL")];
//! let pubmed = vec![PublicationRecord::new(
//!     "Tetracycline Resistance Patterns of Lactobacillus buchneri Group Strains.",
//!     "2020-01-01",
//!     SourceKind::Pubmed,
//! )];
//!
//! let matcher = Matcher::new().with_config(MatcherConfig {
//!     run_in_parallel: false,
//!     ..Default::default()
//! });
//! let links = matcher.link(&pubmed, &drugs);
//! assert_eq!(links.len(), 1);
//! assert_eq!(links[0].drug, "TETRACYCLINE");
//! ```

use crate::{DrugRecord, LinkRecord, PublicationRecord};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Configuration for the matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatcherConfig {
    /// Skip drugs whose name is empty or whitespace, which would otherwise
    /// match every publication
    pub skip_empty_drug_names: bool,
    /// Evaluate publications on the rayon pool. Output order is unchanged.
    pub run_in_parallel: bool,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            skip_empty_drug_names: true,
            run_in_parallel: false,
        }
    }
}

/// Whether `title` mentions `drug`: case-insensitive substring containment.
///
/// An empty `drug` is contained in every title.
pub fn mentions(drug: &str, title: &str) -> bool {
    title.to_lowercase().contains(&drug.to_lowercase())
}

/// Links drugs to the publications that mention them.
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    config: MatcherConfig,
}

/// A drug with its name folded once for all comparisons.
struct Needle<'a> {
    drug: &'a DrugRecord,
    folded: CompactString,
}

impl Matcher {
    /// Creates a matcher with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the configuration
    #[must_use]
    pub fn with_config(mut self, config: MatcherConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    fn needles<'a>(&self, drugs: &'a [DrugRecord]) -> Vec<Needle<'a>> {
        drugs
            .iter()
            .filter(|drug| {
                let empty = drug.name.trim().is_empty();
                if empty && self.config.skip_empty_drug_names {
                    log::warn!("skipping drug with empty name (atccode: {:?})", drug.atccode);
                    return false;
                }
                true
            })
            .map(|drug| Needle {
                drug,
                folded: drug.name.to_lowercase(),
            })
            .collect()
    }

    /// Emit one link per (publication, drug) pair where the title mentions the drug.
    ///
    /// Links come out publication by publication, and within a publication in
    /// drug list order. Nothing is deduplicated.
    pub fn link(&self, publications: &[PublicationRecord], drugs: &[DrugRecord]) -> Vec<LinkRecord> {
        let needles = self.needles(drugs);

        #[cfg(feature = "parallel")]
        if self.config.run_in_parallel {
            use rayon::prelude::*;
            return publications
                .par_iter()
                .flat_map_iter(|publication| links_for(publication, &needles))
                .collect();
        }

        publications
            .iter()
            .flat_map(|publication| links_for(publication, &needles))
            .collect()
    }

    /// Link clinical trials and PubMed publications into one collection.
    ///
    /// All clinical-trial links come before all PubMed links.
    pub fn reconcile(
        &self,
        clinical_trials: &[PublicationRecord],
        pubmed: &[PublicationRecord],
        drugs: &[DrugRecord],
    ) -> Vec<LinkRecord> {
        let mut graph = self.link(clinical_trials, drugs);
        let trial_links = graph.len();
        graph.extend(self.link(pubmed, drugs));
        log::info!(
            "linked {} drug(s): {} clinical trial link(s), {} pubmed link(s)",
            drugs.len(),
            trial_links,
            graph.len() - trial_links
        );
        graph
    }
}

fn links_for<'a>(
    publication: &'a PublicationRecord,
    needles: &'a [Needle<'a>],
) -> impl Iterator<Item = LinkRecord> + 'a {
    let title = publication.title.to_lowercase();
    needles
        .iter()
        .filter(move |needle| title.contains(needle.folded.as_str()))
        .map(move |needle| LinkRecord {
            drug: needle.drug.name.clone(),
            publication: publication.title.clone(),
            date: publication.date.clone(),
            source: publication.source_kind,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SourceKind;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn drugs(names: &[&str]) -> Vec<DrugRecord> {
        names.iter().map(|n| DrugRecord::new(*n)).collect()
    }

    fn trial(title: &str, date: &str) -> PublicationRecord {
        PublicationRecord::new(title, date, SourceKind::ClinicalTrial)
    }

    fn article(title: &str, date: &str) -> PublicationRecord {
        PublicationRecord::new(title, date, SourceKind::Pubmed)
    }

    #[rstest]
    #[case("aspirin", "Effect of aspirin on headache", true)]
    #[case("Aspirin", "...ASPIRIN...", true)]
    #[case("aspirin", "disaspirine tablets", true)]
    #[case("ibuprofen", "Effect of ASPIRIN on headache", false)]
    #[case("", "anything", true)]
    #[case("", "", true)]
    #[case("aspirin", "", false)]
    #[case("ÉTHANOL", "effets de l'éthanol", true)]
    fn test_mentions(#[case] drug: &str, #[case] title: &str, #[case] expected: bool) {
        assert_eq!(mentions(drug, title), expected);
    }

    #[test]
    fn test_end_to_end_scenario() {
        let links = Matcher::new().reconcile(
            &[trial("Effect of ASPIRIN on headache", "2020-01-01")],
            &[],
            &drugs(&["aspirin", "ibuprofen"]),
        );
        assert_eq!(
            links,
            vec![LinkRecord {
                drug: "aspirin".into(),
                publication: "Effect of ASPIRIN on headache".to_string(),
                date: "2020-01-01".to_string(),
                source: SourceKind::ClinicalTrial,
            }]
        );
    }

    #[test]
    fn test_one_publication_many_drugs() {
        let links = Matcher::new().link(
            &[article("Diphenhydramine and epinephrine in anaphylaxis", "01/01/2019")],
            &drugs(&["EPINEPHRINE", "DIPHENHYDRAMINE", "ETHANOL"]),
        );
        let names: Vec<_> = links.iter().map(|l| l.drug.as_str()).collect();
        assert_eq!(names, vec!["EPINEPHRINE", "DIPHENHYDRAMINE"]);
    }

    #[test]
    fn test_needles_fold_compact_drug_names() {
        let names = drugs(&["DIPHENHYDRAMINE", "Isoprenaline"]);
        let needles = Matcher::new().needles(&names);
        let folded: Vec<_> = needles.iter().map(|n| n.folded.as_str()).collect();
        assert_eq!(folded, vec!["diphenhydramine", "isoprenaline"]);
        assert_eq!(needles[1].drug.name, "Isoprenaline");
    }

    #[test]
    fn test_duplicate_publications_give_duplicate_links() {
        let publication = article("Tetracycline resistance", "01/01/2020");
        let links = Matcher::new().link(
            &[publication.clone(), publication],
            &drugs(&["TETRACYCLINE"]),
        );
        assert_eq!(links.len(), 2);
        assert_eq!(links[0], links[1]);
    }

    #[test]
    fn test_clinical_trials_before_pubmed() {
        let links = Matcher::new().reconcile(
            &[trial("Betamethasone trial", "01/01/2020"), trial("Placebo only", "01/01/2020")],
            &[article("Betamethasone review", "2020-01-01")],
            &drugs(&["BETAMETHASONE"]),
        );
        let sources: Vec<_> = links.iter().map(|l| l.source).collect();
        assert_eq!(sources, vec![SourceKind::ClinicalTrial, SourceKind::Pubmed]);
    }

    #[test]
    fn test_reconcile_pubmed_first_in_input_still_ordered() {
        let links = Matcher::new().reconcile(
            &[trial("Ethanol in trials", "01/01/2020")],
            &[article("Ethanol early", "2019-01-01"), article("Ethanol late", "2021-01-01")],
            &drugs(&["ETHANOL"]),
        );
        assert_eq!(links.len(), 3);
        assert_eq!(links[0].source, SourceKind::ClinicalTrial);
        assert!(links[1..].iter().all(|l| l.source == SourceKind::Pubmed));
    }

    #[test]
    fn test_empty_drug_name_skipped_by_default() {
        let links = Matcher::new().link(&[article("Anything at all", "2020-01-01")], &drugs(&["", "  "]));
        assert!(links.is_empty());
    }

    #[test]
    fn test_empty_drug_name_matches_everything_when_allowed() {
        let matcher = Matcher::new().with_config(MatcherConfig {
            skip_empty_drug_names: false,
            ..Default::default()
        });
        let links = matcher.link(
            &[article("First", "2020-01-01"), article("", "2020-01-02")],
            &drugs(&[""]),
        );
        assert_eq!(links.len(), 2);
    }

    #[test]
    fn test_empty_title_matches_nothing() {
        let links = Matcher::new().link(&[trial("", "01/01/2020")], &drugs(&["ATROPINE"]));
        assert!(links.is_empty());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_preserves_order() {
        let publications: Vec<_> = (0..200)
            .map(|i| article(&format!("Study {i} of atropine and ethanol"), "2020-01-01"))
            .collect();
        let names = drugs(&["ETHANOL", "ATROPINE"]);

        let sequential = Matcher::new().link(&publications, &names);
        let parallel = Matcher::new()
            .with_config(MatcherConfig {
                run_in_parallel: true,
                ..Default::default()
            })
            .link(&publications, &names);

        assert_eq!(sequential.len(), 400);
        assert_eq!(sequential, parallel);
    }
}
