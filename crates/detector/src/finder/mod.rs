//! Builds the evaluation tree by walking the project directory once.

use crate::base::{DetectorEvaluation, DetectorEvaluationTree};
use crate::detectable::DetectableEnvironment;
use crate::rule::{glob_to_regex, DetectorRuleSet};
use anyhow::anyhow;
use bomscan_core::fs::FileSystem;
use regex::RegexSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, trace};

pub const DEFAULT_MAX_DEPTH: usize = 16;

/// A directory the walker could not list. Fatal to the whole run; no partial
/// tree is evaluated.
#[derive(Debug, Error)]
#[error("Unable to list directory {path} while searching for detectors")]
pub struct DirectoryListError {
    pub path: PathBuf,
    #[source]
    pub source: anyhow::Error,
}

#[derive(Debug, Clone)]
pub struct FinderOptions {
    /// Directory names never traversed.
    pub excluded_names: Vec<String>,
    /// Glob patterns matched against directory names.
    pub excluded_patterns: Vec<String>,
    pub max_depth: usize,
    /// When set, the walk does not descend beneath a directory in which some
    /// rule's file predicate already matched.
    pub stop_at_detector_match: bool,
}

impl Default for FinderOptions {
    fn default() -> Self {
        Self {
            excluded_names: vec![
                ".git".to_string(),
                ".svn".to_string(),
                ".hg".to_string(),
                "node_modules".to_string(),
            ],
            excluded_patterns: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            stop_at_detector_match: false,
        }
    }
}

pub struct DetectorFinder;

impl DetectorFinder {
    pub fn new() -> Self {
        Self
    }

    /// Walks `root` and produces the evaluation tree: one node per directory,
    /// one unevaluated `DetectorEvaluation` per rule per node. Sibling order
    /// is lexical so repeated walks of an unchanged tree are structurally
    /// identical. Symlinks and excluded names are never traversed.
    pub fn find_detectors(
        &self,
        root: &Path,
        rule_set: &DetectorRuleSet,
        options: &FinderOptions,
        fs: &Arc<dyn FileSystem>,
    ) -> Result<DetectorEvaluationTree, DirectoryListError> {
        if !fs.is_dir(root) {
            return Err(DirectoryListError {
                path: root.to_path_buf(),
                source: anyhow!("Not a directory"),
            });
        }

        let excluded_patterns = compile_patterns(&options.excluded_patterns);
        let tree = self.walk(root, 0, rule_set, options, &excluded_patterns, fs)?;
        debug!(
            directories = tree.node_count(),
            evaluations = tree.flatten().len(),
            "Detector file system traversal complete"
        );
        Ok(tree)
    }

    fn walk(
        &self,
        directory: &Path,
        depth: usize,
        rule_set: &DetectorRuleSet,
        options: &FinderOptions,
        excluded_patterns: &RegexSet,
        fs: &Arc<dyn FileSystem>,
    ) -> Result<DetectorEvaluationTree, DirectoryListError> {
        let mut entries = fs.read_dir(directory).map_err(|source| DirectoryListError {
            path: directory.to_path_buf(),
            source,
        })?;
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        // Symlinked manifests still count as directory contents; symlinked
        // directories are not traversed.
        let file_names: Vec<String> = entries
            .iter()
            .filter(|e| !e.is_dir())
            .map(|e| e.name.clone())
            .collect();

        let evaluations: Vec<DetectorEvaluation> = rule_set
            .rules()
            .map(|(id, rule)| {
                DetectorEvaluation::new(
                    id,
                    rule.clone(),
                    DetectableEnvironment::new(directory.to_path_buf(), fs.clone()),
                )
            })
            .collect();

        let predicate_matched = rule_set
            .rules()
            .any(|(_, rule)| rule.predicate().matches(&file_names));

        let mut children = Vec::new();
        let descend = depth < options.max_depth
            && !(options.stop_at_detector_match && predicate_matched);
        if descend {
            for entry in entries.iter().filter(|e| e.is_dir()) {
                if options.excluded_names.iter().any(|n| *n == entry.name)
                    || excluded_patterns.is_match(&entry.name)
                {
                    trace!(directory = %entry.path.display(), "Skipping excluded directory");
                    continue;
                }
                children.push(self.walk(
                    &entry.path,
                    depth + 1,
                    rule_set,
                    options,
                    excluded_patterns,
                    fs,
                )?);
            }
        }

        Ok(DetectorEvaluationTree::new(
            directory.to_path_buf(),
            depth,
            file_names,
            evaluations,
            children,
        ))
    }
}

impl Default for DetectorFinder {
    fn default() -> Self {
        Self::new()
    }
}

fn compile_patterns(patterns: &[String]) -> RegexSet {
    let translated: Vec<String> = patterns.iter().map(|p| glob_to_regex(p)).collect();
    RegexSet::new(&translated).expect("glob translation always yields valid regexes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::DetectorType;
    use crate::detectable::{Applicability, Detectable, Extractability, Extraction};
    use crate::rule::FilePredicate;
    use bomscan_core::fs::MockFileSystem;

    struct NullDetectable;

    impl Detectable for NullDetectable {
        fn applicable(&self) -> Applicability {
            Applicability::applicable()
        }

        fn extractable(&self) -> Extractability {
            Extractability::extractable()
        }

        fn extract(
            &self,
            _environment: &crate::detectable::ExtractionEnvironment,
        ) -> anyhow::Result<Extraction> {
            Ok(Extraction::success(Vec::new()))
        }
    }

    fn npm_rule_set() -> DetectorRuleSet {
        let mut builder = DetectorRuleSet::builder();
        builder.add_detector(
            DetectorType::Npm,
            "Package Json",
            FilePredicate::name("package.json"),
            Box::new(|_| Box::new(NullDetectable)),
        );
        builder.build()
    }

    fn mock_fs() -> (Arc<dyn FileSystem>, PathBuf) {
        let fs = MockFileSystem::new();
        let root = fs.root().to_path_buf();
        fs.add_file("package.json", "{}");
        fs.add_dir("modules");
        fs.add_file("modules/api/package.json", "{}");
        fs.add_file("modules/web/package.json", "{}");
        fs.add_dir("node_modules");
        fs.add_file("node_modules/lodash/package.json", "{}");
        (Arc::new(fs), root)
    }

    #[test]
    fn test_one_node_per_directory_excluding_patterns() {
        let (fs, root) = mock_fs();
        let rule_set = npm_rule_set();
        let tree = DetectorFinder::new()
            .find_detectors(&root, &rule_set, &FinderOptions::default(), &fs)
            .unwrap();

        // root, modules, modules/api, modules/web; node_modules excluded
        assert_eq!(tree.node_count(), 4);
        assert!(tree
            .children()
            .iter()
            .all(|c| !c.directory().ends_with("node_modules")));
    }

    #[test]
    fn test_sibling_order_is_stable() {
        let (fs, root) = mock_fs();
        let rule_set = npm_rule_set();
        let finder = DetectorFinder::new();
        let options = FinderOptions::default();

        let first = finder.find_detectors(&root, &rule_set, &options, &fs).unwrap();
        let second = finder.find_detectors(&root, &rule_set, &options, &fs).unwrap();

        let dirs = |tree: &DetectorEvaluationTree| {
            let mut out = Vec::new();
            tree.for_each_node(&mut |node| out.push(node.directory().to_path_buf()));
            out
        };
        assert_eq!(dirs(&first), dirs(&second));

        let modules = first
            .children()
            .iter()
            .find(|c| c.directory().ends_with("modules"))
            .unwrap();
        let names: Vec<&Path> = modules.children().iter().map(|c| c.directory()).collect();
        assert!(names[0] < names[1], "children must be lexically ordered");
    }

    #[test]
    fn test_max_depth_limits_walk() {
        let (fs, root) = mock_fs();
        let rule_set = npm_rule_set();
        let options = FinderOptions {
            max_depth: 1,
            ..FinderOptions::default()
        };
        let tree = DetectorFinder::new()
            .find_detectors(&root, &rule_set, &options, &fs)
            .unwrap();

        // root + modules; modules/api and modules/web are beyond depth 1
        assert_eq!(tree.node_count(), 2);
    }

    #[test]
    fn test_stop_at_detector_match() {
        let (fs, root) = mock_fs();
        let rule_set = npm_rule_set();
        let options = FinderOptions {
            stop_at_detector_match: true,
            ..FinderOptions::default()
        };
        let tree = DetectorFinder::new()
            .find_detectors(&root, &rule_set, &options, &fs)
            .unwrap();

        // package.json at the root matches, so nothing beneath is walked
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn test_symlinked_directories_are_not_traversed() {
        let fs = MockFileSystem::new();
        let root = fs.root().to_path_buf();
        fs.add_file("package.json", "{}");
        fs.add_symlink("looping-link");
        let fs: Arc<dyn FileSystem> = Arc::new(fs);

        let tree = DetectorFinder::new()
            .find_detectors(&root, &npm_rule_set(), &FinderOptions::default(), &fs)
            .unwrap();
        assert_eq!(tree.node_count(), 1);
        // the symlink still counts as directory contents
        assert!(tree.file_names().contains(&"looping-link".to_string()));
    }

    #[test]
    fn test_unlistable_root_is_a_distinguished_error() {
        let fs: Arc<dyn FileSystem> = Arc::new(MockFileSystem::new());
        let err = DetectorFinder::new()
            .find_detectors(
                Path::new("/does/not/exist"),
                &npm_rule_set(),
                &FinderOptions::default(),
                &fs,
            )
            .unwrap_err();
        assert_eq!(err.path, Path::new("/does/not/exist"));
    }

    #[test]
    fn test_every_node_has_one_evaluation_per_rule() {
        let (fs, root) = mock_fs();
        let rule_set = npm_rule_set();
        let tree = DetectorFinder::new()
            .find_detectors(&root, &rule_set, &FinderOptions::default(), &fs)
            .unwrap();

        tree.for_each_node(&mut |node| {
            assert_eq!(node.evaluations().len(), rule_set.len());
        });
    }
}
