//! Top-level orchestration: walk, evaluate, assemble, decide, notify.

use crate::codelocation::assemble_code_locations;
use crate::error::DetectUserFriendlyError;
use crate::event::EventSystem;
use crate::project::decide_suggestion;
use crate::result::DetectorToolResult;
use bomscan_core::fs::FileSystem;
use bomscan_core::ExitCodeType;
use bomscan_detector::{
    DetectorEvaluator, DetectorFinder, DetectorRuleSet, DetectorType, FinderOptions,
};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

pub struct DetectorToolOptions {
    pub finder: FinderOptions,
    /// Root directory extraction scratch directories are created under.
    pub output_root: PathBuf,
    /// User-forced detector type for the name/version suggestion.
    pub project_detector: Option<DetectorType>,
}

pub struct DetectorTool {
    event_system: EventSystem,
}

impl DetectorTool {
    pub fn new(event_system: EventSystem) -> Self {
        Self { event_system }
    }

    /// Runs the full detector workflow against `directory`. Only a failure
    /// to list a directory during the walk aborts the run; every
    /// per-detector failure is recorded in the returned result.
    pub fn perform_detectors(
        &self,
        fs: &Arc<dyn FileSystem>,
        directory: &Path,
        rule_set: &DetectorRuleSet,
        options: &DetectorToolOptions,
    ) -> Result<DetectorToolResult, DetectUserFriendlyError> {
        info!(directory = %directory.display(), "Initializing detector system");

        info!("Starting detector file system traversal");
        let finder = DetectorFinder::new();
        let mut root_evaluation = finder
            .find_detectors(directory, rule_set, &options.finder, fs)
            .map_err(|err| {
                DetectUserFriendlyError::with_source(
                    "Unable to list a directory while searching for detectors.",
                    ExitCodeType::FailureDetector,
                    err.into(),
                )
            })?;

        let evaluator = DetectorEvaluator::new(rule_set);

        evaluator.search_and_applicable_evaluation(&mut root_evaluation);
        self.event_system.publish_search_completed(&root_evaluation);

        evaluator.extractable_evaluation(&mut root_evaluation);
        self.event_system
            .publish_preparations_completed(&root_evaluation);

        evaluator.extraction_evaluation(&mut root_evaluation, &options.output_root);
        self.event_system
            .publish_extractions_completed(&root_evaluation);

        let evaluations = root_evaluation.flatten();

        let applicable_detector_types: BTreeSet<DetectorType> = evaluations
            .iter()
            .filter(|e| e.is_applicable())
            .map(|e| e.rule().detector_type())
            .collect();

        let successful_detector_types: BTreeSet<DetectorType> = evaluations
            .iter()
            .filter(|e| e.was_extraction_successful())
            .map(|e| e.rule().detector_type())
            .collect();

        let failed_detector_types: BTreeSet<DetectorType> = evaluations
            .iter()
            .filter(|e| e.extraction().is_some() && !e.was_extraction_successful())
            .map(|e| e.rule().detector_type())
            .collect();

        let project_name_version =
            decide_suggestion(&evaluations, options.project_detector);
        info!("Finished evaluating detectors for project info");

        drop(evaluations);

        let code_location_map = assemble_code_locations(directory, &root_evaluation);
        let bom_tool_code_locations = code_location_map
            .iter()
            .map(|(_, detect)| detect.clone())
            .collect();

        let result = DetectorToolResult {
            root_evaluation,
            applicable_detector_types,
            successful_detector_types,
            failed_detector_types,
            code_location_map,
            bom_tool_code_locations,
            project_name_version,
        };

        info!("Finished running detectors");
        self.event_system.publish_detectors_complete(&result);

        Ok(result)
    }
}
