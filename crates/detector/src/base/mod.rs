//! Per-(node, rule) evaluation state and the filesystem-mirroring tree.

mod detector_type;
mod evaluation;
mod tree;

pub use detector_type::DetectorType;
pub use evaluation::{DetectorEvaluation, DetectorEvaluationStatus};
pub use tree::DetectorEvaluationTree;
