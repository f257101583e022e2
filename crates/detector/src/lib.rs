//! Detector evaluation engine: walks a directory tree, decides which
//! detector rules apply per directory with yield and nesting precedence, and
//! drives the three-phase search/extractable/extraction state machine.

pub mod base;
pub mod detectable;
pub mod evaluate;
pub mod finder;
pub mod rule;

pub use base::{DetectorEvaluation, DetectorEvaluationStatus, DetectorEvaluationTree, DetectorType};
pub use detectable::{
    Applicability, CodeLocation, Detectable, DetectableEnvironment, Extractability, Extraction,
    ExtractionEnvironment, ExtractionId, ExtractionResultType,
};
pub use evaluate::DetectorEvaluator;
pub use finder::{DetectorFinder, DirectoryListError, FinderOptions};
pub use rule::{DetectorRule, DetectorRuleSet, DetectorRuleSetBuilder, FilePredicate, RuleId};
