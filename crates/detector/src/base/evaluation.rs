use crate::detectable::{
    Applicability, Detectable, DetectableEnvironment, Extractability, Extraction, ExtractionId,
};
use crate::rule::{DetectorRule, RuleId};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Reporting view of an evaluation's position in the phase state machine.
/// `NotApplicable`, `NotExtractable` and the three extraction outcomes are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DetectorEvaluationStatus {
    NotSearched,
    NotApplicable,
    Applicable,
    NotExtractable,
    Extractable,
    ExtractionSuccess,
    ExtractionFailure,
    ExtractionException,
}

/// One (directory, rule) pair. Mutated exclusively by the evaluator during
/// its three passes; read-only afterward.
pub struct DetectorEvaluation {
    rule_id: RuleId,
    rule: Arc<DetectorRule>,
    environment: DetectableEnvironment,
    detectable: Option<Box<dyn Detectable>>,
    applicability: Option<Applicability>,
    extractability: Option<Extractability>,
    extraction_id: Option<ExtractionId>,
    extraction: Option<Extraction>,
}

impl DetectorEvaluation {
    pub fn new(rule_id: RuleId, rule: Arc<DetectorRule>, environment: DetectableEnvironment) -> Self {
        Self {
            rule_id,
            rule,
            environment,
            detectable: None,
            applicability: None,
            extractability: None,
            extraction_id: None,
            extraction: None,
        }
    }

    pub fn rule_id(&self) -> RuleId {
        self.rule_id
    }

    pub fn rule(&self) -> &Arc<DetectorRule> {
        &self.rule
    }

    pub fn environment(&self) -> &DetectableEnvironment {
        &self.environment
    }

    /// True once the rule's file predicate matched this directory, even if
    /// the evaluation was later suppressed by yield or nesting precedence.
    pub fn predicate_matched(&self) -> bool {
        self.detectable.is_some()
    }

    pub fn is_applicable(&self) -> bool {
        self.applicability
            .as_ref()
            .map(Applicability::is_applicable)
            .unwrap_or(false)
    }

    pub fn is_extractable(&self) -> bool {
        self.extractability
            .as_ref()
            .map(Extractability::is_extractable)
            .unwrap_or(false)
    }

    pub fn was_extraction_successful(&self) -> bool {
        self.extraction
            .as_ref()
            .map(Extraction::was_successful)
            .unwrap_or(false)
    }

    pub fn applicability(&self) -> Option<&Applicability> {
        self.applicability.as_ref()
    }

    pub fn extractability(&self) -> Option<&Extractability> {
        self.extractability.as_ref()
    }

    pub fn extraction_id(&self) -> Option<&ExtractionId> {
        self.extraction_id.as_ref()
    }

    pub fn extraction(&self) -> Option<&Extraction> {
        self.extraction.as_ref()
    }

    pub fn status(&self) -> DetectorEvaluationStatus {
        if let Some(extraction) = &self.extraction {
            return match extraction.result {
                crate::detectable::ExtractionResultType::Success => {
                    DetectorEvaluationStatus::ExtractionSuccess
                }
                crate::detectable::ExtractionResultType::Failure => {
                    DetectorEvaluationStatus::ExtractionFailure
                }
                crate::detectable::ExtractionResultType::Exception => {
                    DetectorEvaluationStatus::ExtractionException
                }
            };
        }
        if let Some(extractability) = &self.extractability {
            return if extractability.is_extractable() {
                DetectorEvaluationStatus::Extractable
            } else {
                DetectorEvaluationStatus::NotExtractable
            };
        }
        if let Some(applicability) = &self.applicability {
            return if applicability.is_applicable() {
                DetectorEvaluationStatus::Applicable
            } else {
                DetectorEvaluationStatus::NotApplicable
            };
        }
        DetectorEvaluationStatus::NotSearched
    }

    /// Human-readable reason the evaluation stopped where it did, if any.
    pub fn status_reason(&self) -> Option<&str> {
        if let Some(extraction) = &self.extraction {
            return extraction.description.as_deref();
        }
        if let Some(extractability) = &self.extractability {
            return extractability.reason();
        }
        self.applicability.as_ref().and_then(Applicability::reason)
    }

    pub(crate) fn detectable(&self) -> Option<&dyn Detectable> {
        self.detectable.as_deref()
    }

    pub(crate) fn set_detectable(&mut self, detectable: Box<dyn Detectable>) {
        self.detectable = Some(detectable);
    }

    pub(crate) fn set_applicability(&mut self, applicability: Applicability) {
        self.applicability = Some(applicability);
    }

    pub(crate) fn set_extractability(&mut self, extractability: Extractability) {
        self.extractability = Some(extractability);
    }

    pub(crate) fn set_extraction_id(&mut self, extraction_id: ExtractionId) {
        self.extraction_id = Some(extraction_id);
    }

    pub(crate) fn set_extraction(&mut self, extraction: Extraction) {
        self.extraction = Some(extraction);
    }
}

impl fmt::Debug for DetectorEvaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DetectorEvaluation")
            .field("rule", &self.rule.name())
            .field("directory", &self.environment.directory())
            .field("status", &self.status())
            .finish()
    }
}
