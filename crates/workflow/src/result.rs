use crate::codelocation::DetectCodeLocation;
use crate::project::NameVersion;
use bomscan_detector::{CodeLocation, DetectorEvaluationTree, DetectorType};
use std::collections::BTreeSet;

/// Everything one evaluation run produced. The tree is read-only from here
/// on; reporters and the upload collaborator consume this object only after
/// all three phases completed.
#[derive(Debug)]
pub struct DetectorToolResult {
    pub root_evaluation: DetectorEvaluationTree,
    /// Detector types applicable anywhere in the tree after yield and
    /// nesting resolution.
    pub applicable_detector_types: BTreeSet<DetectorType>,
    /// Detector types whose extraction succeeded / did not succeed.
    pub successful_detector_types: BTreeSet<DetectorType>,
    pub failed_detector_types: BTreeSet<DetectorType>,
    /// Raw-to-aggregated pairs in traversal order, duplicates preserved.
    pub code_location_map: Vec<(CodeLocation, DetectCodeLocation)>,
    pub bom_tool_code_locations: Vec<DetectCodeLocation>,
    pub project_name_version: Option<NameVersion>,
}
