use super::FilePredicate;
use crate::base::DetectorType;
use crate::detectable::{Detectable, DetectableEnvironment};
use std::fmt;

pub type DetectableCreator =
    Box<dyn Fn(DetectableEnvironment) -> Box<dyn Detectable> + Send + Sync>;

/// Immutable descriptor of one detector: ecosystem type, display name, the
/// required-file predicate, nesting behavior, and the factory producing its
/// detectable for a given directory. Shared read-only across the whole tree.
pub struct DetectorRule {
    detector_type: DetectorType,
    name: String,
    predicate: FilePredicate,
    nestable: bool,
    name_version_priority: i32,
    creator: DetectableCreator,
}

impl DetectorRule {
    pub(crate) fn new(
        detector_type: DetectorType,
        name: &str,
        predicate: FilePredicate,
        creator: DetectableCreator,
    ) -> Self {
        Self {
            detector_type,
            name: name.to_string(),
            predicate,
            nestable: true,
            name_version_priority: 0,
            creator,
        }
    }

    pub(crate) fn set_nestable(&mut self, nestable: bool) {
        self.nestable = nestable;
    }

    pub(crate) fn set_name_version_priority(&mut self, priority: i32) {
        self.name_version_priority = priority;
    }

    pub fn detector_type(&self) -> DetectorType {
        self.detector_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn predicate(&self) -> &FilePredicate {
        &self.predicate
    }

    /// A non-nestable rule is suppressed when the same detector type is
    /// applicable in a strict descendant directory.
    pub fn nestable(&self) -> bool {
        self.nestable
    }

    pub fn name_version_priority(&self) -> i32 {
        self.name_version_priority
    }

    pub fn create_detectable(&self, environment: DetectableEnvironment) -> Box<dyn Detectable> {
        (self.creator)(environment)
    }
}

impl fmt::Debug for DetectorRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DetectorRule")
            .field("detector_type", &self.detector_type)
            .field("name", &self.name)
            .field("predicate", &self.predicate.describe())
            .field("nestable", &self.nestable)
            .finish()
    }
}
