//! The contract every per-ecosystem detectable implements, and the types its
//! extraction produces.

mod environment;
mod extraction;

pub use environment::DetectableEnvironment;
pub use extraction::{
    CodeLocation, Extraction, ExtractionEnvironment, ExtractionId, ExtractionResultType,
};

use anyhow::Result;

/// Outcome of a detectable's applicability check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applicability {
    Applicable,
    NotApplicable(String),
}

impl Applicability {
    pub fn applicable() -> Self {
        Applicability::Applicable
    }

    pub fn not_applicable(reason: impl Into<String>) -> Self {
        Applicability::NotApplicable(reason.into())
    }

    pub fn is_applicable(&self) -> bool {
        matches!(self, Applicability::Applicable)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Applicability::Applicable => None,
            Applicability::NotApplicable(reason) => Some(reason),
        }
    }
}

/// Outcome of a detectable's precondition check. An unmet precondition is
/// recorded, never raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extractability {
    Extractable,
    NotExtractable(String),
}

impl Extractability {
    pub fn extractable() -> Self {
        Extractability::Extractable
    }

    pub fn not_extractable(reason: impl Into<String>) -> Self {
        Extractability::NotExtractable(reason.into())
    }

    pub fn is_extractable(&self) -> bool {
        matches!(self, Extractability::Extractable)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Extractability::Extractable => None,
            Extractability::NotExtractable(reason) => Some(reason),
        }
    }
}

/// Per-ecosystem detector capability. Implementations are constructed against
/// one directory (the `DetectableEnvironment` given to the rule's factory)
/// and are driven through the three phases in order.
///
/// `extract` errors are captured by the evaluator as an `Exception` result;
/// they never abort sibling evaluations. Returning no code locations is a
/// success, not a failure.
pub trait Detectable: Send {
    /// Refines the rule's file predicate against the directory's contents.
    fn applicable(&self) -> Applicability;

    /// Checks preconditions for extraction, e.g. a required executable.
    fn extractable(&self) -> Extractability;

    /// Runs the extraction inside the isolated scratch environment.
    fn extract(&self, environment: &ExtractionEnvironment) -> Result<Extraction>;
}
