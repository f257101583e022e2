//! Converts raw extraction output into deterministically identified code
//! locations, the unit handed to the upload collaborator.

use bomscan_core::graph::{DependencyGraph, ExternalId, Forge};
use bomscan_detector::{CodeLocation, DetectorEvaluationTree, DetectorType};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Final aggregated entity: a dependency graph with a guaranteed source path
/// and external id. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectCodeLocation {
    pub dependency_graph: DependencyGraph,
    pub source_path: PathBuf,
    pub external_id: ExternalId,
    pub detector_type: DetectorType,
}

/// Walks the completed tree and produces one `DetectCodeLocation` per raw
/// `CodeLocation` of every successful extraction, in traversal order.
/// Duplicates are preserved as distinct entries; nothing is merged by value.
pub fn assemble_code_locations(
    scan_root: &Path,
    tree: &DetectorEvaluationTree,
) -> Vec<(CodeLocation, DetectCodeLocation)> {
    let mut assembled = Vec::new();

    for evaluation in tree.flatten() {
        if !evaluation.was_extraction_successful() {
            continue;
        }
        let extraction = match evaluation.extraction() {
            Some(extraction) => extraction,
            None => continue,
        };
        for code_location in &extraction.code_locations {
            // source path defaults to the directory the evaluation ran in
            let source_path = code_location
                .source_path()
                .unwrap_or_else(|| evaluation.environment().directory())
                .to_path_buf();

            let external_id = match code_location.external_id() {
                Some(id) => id.clone(),
                None => {
                    let relative = relativize(scan_root, &source_path);
                    let synthesized = ExternalId::path(Forge::bomscan(), &relative);
                    warn!(
                        source_path = %source_path.display(),
                        external_id = %synthesized,
                        "Detector did not supply an external id; synthesized one from the file path"
                    );
                    synthesized
                }
            };

            let detect_code_location = DetectCodeLocation {
                dependency_graph: code_location.dependency_graph().clone(),
                source_path,
                external_id,
                detector_type: evaluation.rule().detector_type(),
            };
            assembled.push((code_location.clone(), detect_code_location));
        }
    }

    assembled
}

/// Path of `target` relative to `root`, joined with forward slashes. Falls
/// back to the full path when `target` is outside `root`.
pub fn relativize(root: &Path, target: &Path) -> String {
    let relative = target.strip_prefix(root).unwrap_or(target);
    let pieces: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();
    pieces.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relativize() {
        assert_eq!(
            relativize(Path::new("/project"), Path::new("/project/modules/api")),
            "modules/api"
        );
        assert_eq!(relativize(Path::new("/project"), Path::new("/project")), "");
        assert_eq!(
            relativize(Path::new("/project"), Path::new("/elsewhere/api")),
            "/elsewhere/api"
        );
    }

    #[test]
    fn test_synthesized_id_is_deterministic() {
        let root = Path::new("/project");
        let a = ExternalId::path(
            Forge::bomscan(),
            &relativize(root, Path::new("/project/modules/api")),
        );
        let b = ExternalId::path(
            Forge::bomscan(),
            &relativize(root, Path::new("/project/modules/api")),
        );
        assert_eq!(a, b);
    }
}
