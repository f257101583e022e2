//! Selects the single suggested project name and version from all evaluated
//! detectors.

use bomscan_detector::{DetectorEvaluation, DetectorType};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameVersion {
    pub name: String,
    pub version: Option<String>,
}

/// Candidates are evaluations that extracted successfully and report a
/// project name. A forced detector type wins unconditionally when present;
/// otherwise the highest rule-declared priority wins, ties broken by
/// traversal order. Absence of a suggestion is a valid outcome, not an
/// error.
pub fn decide_suggestion(
    evaluations: &[&DetectorEvaluation],
    forced_type: Option<DetectorType>,
) -> Option<NameVersion> {
    let candidates: Vec<&&DetectorEvaluation> = evaluations
        .iter()
        .filter(|e| e.was_extraction_successful())
        .filter(|e| {
            e.extraction()
                .map(|x| x.project_name.is_some())
                .unwrap_or(false)
        })
        .collect();

    if candidates.is_empty() {
        debug!("No detector offered a project name/version suggestion");
        return None;
    }

    let chosen = forced_type
        .and_then(|forced| {
            candidates
                .iter()
                .find(|e| e.rule().detector_type() == forced)
                .copied()
        })
        .or_else(|| {
            // strictly-greater comparison keeps the first candidate in
            // traversal order on priority ties
            let mut best: Option<&&DetectorEvaluation> = None;
            for candidate in &candidates {
                let better = match best {
                    None => true,
                    Some(current) => {
                        candidate.rule().name_version_priority()
                            > current.rule().name_version_priority()
                    }
                };
                if better {
                    best = Some(candidate);
                }
            }
            best
        })?;

    let extraction = chosen.extraction()?;
    let name = extraction.project_name.clone()?;
    debug!(
        detector = chosen.rule().name(),
        project = %name,
        "Decided project name/version suggestion"
    );
    Some(NameVersion {
        name,
        version: extraction.project_version.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bomscan_core::fs::{FileSystem, MockFileSystem};
    use bomscan_detector::{
        Applicability, Detectable, DetectorEvaluationTree, DetectorEvaluator, DetectorFinder,
        DetectorRuleSet, Extractability, Extraction, ExtractionEnvironment, FilePredicate,
        FinderOptions,
    };
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::TempDir;

    struct SuggestingDetectable {
        name: Option<String>,
        version: Option<String>,
    }

    impl Detectable for SuggestingDetectable {
        fn applicable(&self) -> Applicability {
            Applicability::applicable()
        }

        fn extractable(&self) -> Extractability {
            Extractability::extractable()
        }

        fn extract(&self, _environment: &ExtractionEnvironment) -> anyhow::Result<Extraction> {
            Ok(Extraction::success(Vec::new())
                .with_project(self.name.clone(), self.version.clone()))
        }
    }

    fn run_phases(
        rule_set: &DetectorRuleSet,
        fs: &Arc<dyn FileSystem>,
        root: &Path,
    ) -> DetectorEvaluationTree {
        let mut tree = DetectorFinder::new()
            .find_detectors(root, rule_set, &FinderOptions::default(), fs)
            .unwrap();
        let evaluator = DetectorEvaluator::new(rule_set);
        evaluator.search_and_applicable_evaluation(&mut tree);
        evaluator.extractable_evaluation(&mut tree);
        let scratch = TempDir::new().unwrap();
        evaluator.extraction_evaluation(&mut tree, scratch.path());
        tree
    }

    fn marker_fs() -> (Arc<dyn FileSystem>, std::path::PathBuf) {
        let fs = MockFileSystem::new();
        let root = fs.root().to_path_buf();
        fs.add_file("a.marker", "");
        fs.add_file("b.marker", "");
        (Arc::new(fs), root)
    }

    fn add_suggesting(
        builder: &mut bomscan_detector::DetectorRuleSetBuilder,
        detector_type: DetectorType,
        rule_name: &str,
        marker: &str,
        project: &str,
        priority: i32,
    ) {
        let project = project.to_string();
        let id = builder.add_detector(
            detector_type,
            rule_name,
            FilePredicate::name(marker),
            Box::new(move |_| {
                Box::new(SuggestingDetectable {
                    name: Some(project.clone()),
                    version: Some("1.0".to_string()),
                }) as Box<dyn Detectable>
            }),
        );
        builder.name_version_priority(id, priority);
    }

    #[test]
    fn test_equal_priority_tie_keeps_first_in_traversal_order() {
        let (fs, root) = marker_fs();

        let mut builder = DetectorRuleSet::builder();
        add_suggesting(&mut builder, DetectorType::Npm, "First", "a.marker", "alpha", 5);
        add_suggesting(&mut builder, DetectorType::Pip, "Second", "b.marker", "beta", 5);
        let rule_set = builder.build();
        let tree = run_phases(&rule_set, &fs, &root);
        let decided = decide_suggestion(&tree.flatten(), None).unwrap();
        assert_eq!(decided.name, "alpha");

        // swapping registration order swaps the tie winner
        let mut builder = DetectorRuleSet::builder();
        add_suggesting(&mut builder, DetectorType::Pip, "Second", "b.marker", "beta", 5);
        add_suggesting(&mut builder, DetectorType::Npm, "First", "a.marker", "alpha", 5);
        let rule_set = builder.build();
        let tree = run_phases(&rule_set, &fs, &root);
        let decided = decide_suggestion(&tree.flatten(), None).unwrap();
        assert_eq!(decided.name, "beta");
    }

    #[test]
    fn test_no_qualifying_evaluation_yields_no_suggestion() {
        let (fs, root) = marker_fs();
        let mut builder = DetectorRuleSet::builder();
        // extracts successfully but reports no project name
        let nameless = builder.add_detector(
            DetectorType::Npm,
            "Nameless",
            FilePredicate::name("a.marker"),
            Box::new(|_| {
                Box::new(SuggestingDetectable {
                    name: None,
                    version: None,
                }) as Box<dyn Detectable>
            }),
        );
        builder.name_version_priority(nameless, 9);
        // never applicable at all
        add_suggesting(&mut builder, DetectorType::Maven, "Missed", "pom.xml", "app", 9);
        let rule_set = builder.build();

        let tree = run_phases(&rule_set, &fs, &root);
        assert!(decide_suggestion(&tree.flatten(), None).is_none());
    }

    #[test]
    fn test_forced_type_without_candidate_falls_back_to_priority() {
        let (fs, root) = marker_fs();
        let mut builder = DetectorRuleSet::builder();
        add_suggesting(&mut builder, DetectorType::Npm, "Low", "a.marker", "low", 2);
        add_suggesting(&mut builder, DetectorType::Pip, "High", "b.marker", "high", 7);
        let rule_set = builder.build();

        let tree = run_phases(&rule_set, &fs, &root);
        let decided = decide_suggestion(&tree.flatten(), Some(DetectorType::Cargo)).unwrap();
        assert_eq!(decided.name, "high");
    }
}
