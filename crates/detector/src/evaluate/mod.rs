//! Drives the three sequential phases over the evaluation tree: search and
//! applicability (with yield and nesting resolution), extractability, and
//! extraction.

use crate::base::{DetectorEvaluationTree, DetectorType};
use crate::detectable::{
    Applicability, Extractability, Extraction, ExtractionEnvironment, ExtractionId,
};
use crate::rule::DetectorRuleSet;
use anyhow::{anyhow, Context};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, error, info};

pub struct DetectorEvaluator<'a> {
    rule_set: &'a DetectorRuleSet,
}

impl<'a> DetectorEvaluator<'a> {
    pub fn new(rule_set: &'a DetectorRuleSet) -> Self {
        Self { rule_set }
    }

    /// Phase 1: post-order over the tree. Per node, every rule's file
    /// predicate runs against the directory contents captured at walk time,
    /// then the detectable's own applicability check. Among applicable rules
    /// in the same node, a rule yielding to another applicable rule is
    /// suppressed; a non-nestable rule whose detector type was already found
    /// applicable in a strict descendant is suppressed as well.
    pub fn search_and_applicable_evaluation(&self, tree: &mut DetectorEvaluationTree) {
        info!("Starting detector search");
        let applicable = self.search_node(tree);
        info!(
            applicable_types = applicable.len(),
            "Detector search complete"
        );
    }

    fn search_node(&self, node: &mut DetectorEvaluationTree) -> HashSet<DetectorType> {
        // children first: nesting precedence resolves bottom-up
        let mut nested_applicable = HashSet::new();
        for child in node.children_mut() {
            nested_applicable.extend(self.search_node(child));
        }

        let file_names = node.file_names().to_vec();

        for evaluation in node.evaluations_mut() {
            let rule = evaluation.rule().clone();
            if !rule.predicate().matches(&file_names) {
                evaluation.set_applicability(Applicability::not_applicable(format!(
                    "No file matched: {}",
                    rule.predicate().describe()
                )));
                continue;
            }
            let detectable = rule.create_detectable(evaluation.environment().clone());
            let applicability = detectable.applicable();
            evaluation.set_detectable(detectable);
            evaluation.set_applicability(applicability);
        }

        // Yield resolution uses the pre-suppression applicable set, so a rule
        // that yields to a (possibly itself-yielding) applicable rule is
        // always suppressed regardless of discovery order.
        let applicable_before_yield: HashSet<_> = node
            .evaluations()
            .iter()
            .filter(|e| e.is_applicable())
            .map(|e| e.rule_id())
            .collect();

        for evaluation in node.evaluations_mut() {
            if !evaluation.is_applicable() {
                continue;
            }
            let yielded_to = self
                .rule_set
                .yields_to(evaluation.rule_id())
                .iter()
                .find(|to| applicable_before_yield.contains(*to))
                .copied();
            if let Some(winner) = yielded_to {
                let winner_name = self.rule_set.rule(winner).name().to_string();
                debug!(
                    directory = %node_directory(evaluation.environment().directory()),
                    loser = evaluation.rule().name(),
                    winner = %winner_name,
                    "Detector yielded"
                );
                evaluation
                    .set_applicability(Applicability::not_applicable(format!("Yielded to {}", winner_name)));
            }
        }

        for evaluation in node.evaluations_mut() {
            if !evaluation.is_applicable() {
                continue;
            }
            let rule = evaluation.rule().clone();
            if !rule.nestable() && nested_applicable.contains(&rule.detector_type()) {
                evaluation.set_applicability(Applicability::not_applicable(format!(
                    "Deferred to a nested {} project",
                    rule.detector_type()
                )));
            }
        }

        nested_applicable.extend(
            node.evaluations()
                .iter()
                .filter(|e| e.is_applicable())
                .map(|e| e.rule().detector_type()),
        );
        nested_applicable
    }

    /// Phase 2: precondition check for every evaluation still applicable.
    /// An unmet precondition is recorded as not-extractable, never an error.
    pub fn extractable_evaluation(&self, tree: &mut DetectorEvaluationTree) {
        info!("Starting detector preparation");
        self.prepare_node(tree);
    }

    fn prepare_node(&self, node: &mut DetectorEvaluationTree) {
        for evaluation in node.evaluations_mut() {
            if !evaluation.is_applicable() {
                continue;
            }
            let extractability = match evaluation.detectable() {
                Some(detectable) => detectable.extractable(),
                None => Extractability::not_extractable("Detectable was never constructed"),
            };
            if let Some(reason) = extractability.reason() {
                debug!(
                    detector = evaluation.rule().name(),
                    reason, "Detector not extractable"
                );
            }
            evaluation.set_extractability(extractability);
        }
        for child in node.children_mut() {
            self.prepare_node(child);
        }
    }

    /// Phase 3: runs every extractable evaluation in its own scratch
    /// directory beneath `output_root`. Failures of one extraction never
    /// prevent any other.
    pub fn extraction_evaluation(&self, tree: &mut DetectorEvaluationTree, output_root: &Path) {
        let total = tree.flatten().iter().filter(|e| e.is_extractable()).count();
        info!(extractions = total, "Starting detector extraction");
        let mut ordinal = 0;
        self.extract_node(tree, output_root, total, &mut ordinal);
    }

    fn extract_node(
        &self,
        node: &mut DetectorEvaluationTree,
        output_root: &Path,
        total: usize,
        ordinal: &mut usize,
    ) {
        for evaluation in node.evaluations_mut() {
            if !evaluation.is_extractable() {
                continue;
            }

            let extraction_id = ExtractionId::new(evaluation.rule().detector_type(), *ordinal);
            let progress = (*ordinal as f64 * 100.0 / total.max(1) as f64).floor() as u32;
            info!(
                detector = evaluation.rule().name(),
                id = %extraction_id.to_unique_string(),
                "Extracting {} of {} ({}%)",
                *ordinal + 1,
                total,
                progress
            );
            *ordinal += 1;

            let scratch = output_root.join(extraction_id.to_unique_string());
            evaluation.set_extraction_id(extraction_id);

            let extraction = match std::fs::create_dir_all(&scratch)
                .context(format!("Failed to create extraction directory {:?}", scratch))
            {
                Err(err) => Extraction::exception(err),
                Ok(()) => {
                    let environment = ExtractionEnvironment::new(scratch);
                    match evaluation.detectable() {
                        Some(detectable) => match detectable.extract(&environment) {
                            Ok(extraction) => extraction,
                            Err(err) => Extraction::exception(err),
                        },
                        None => Extraction::exception(anyhow!("Detectable was never constructed")),
                    }
                }
            };

            match &extraction.error {
                Some(err) => error!(
                    detector = evaluation.rule().name(),
                    error = %err,
                    "Extraction raised an exception"
                ),
                None => info!(
                    detector = evaluation.rule().name(),
                    result = %extraction.result,
                    code_locations = extraction.code_locations.len(),
                    "Finished extraction"
                ),
            }
            evaluation.set_extraction(extraction);
        }

        for child in node.children_mut() {
            self.extract_node(child, output_root, total, ordinal);
        }
    }
}

fn node_directory(path: &Path) -> String {
    path.display().to_string()
}
