use super::rule::{DetectableCreator, DetectorRule};
use super::FilePredicate;
use crate::base::DetectorType;
use std::collections::HashMap;
use std::sync::Arc;

/// Stable handle to a rule within one rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleId(usize);

/// The complete set of detector rules known to the system, with the yield
/// relations between them.
#[derive(Debug)]
pub struct DetectorRuleSet {
    rules: Vec<Arc<DetectorRule>>,
    yields: HashMap<RuleId, Vec<RuleId>>,
}

impl DetectorRuleSet {
    pub fn builder() -> DetectorRuleSetBuilder {
        DetectorRuleSetBuilder::new()
    }

    pub fn rules(&self) -> impl Iterator<Item = (RuleId, &Arc<DetectorRule>)> {
        self.rules.iter().enumerate().map(|(i, r)| (RuleId(i), r))
    }

    pub fn rule(&self, id: RuleId) -> &Arc<DetectorRule> {
        &self.rules[id.0]
    }

    /// Rules that take precedence over `id` when also applicable in the same
    /// directory.
    pub fn yields_to(&self, id: RuleId) -> &[RuleId] {
        self.yields.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

pub struct DetectorRuleSetBuilder {
    rules: Vec<DetectorRule>,
    yields: HashMap<RuleId, Vec<RuleId>>,
}

impl DetectorRuleSetBuilder {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            yields: HashMap::new(),
        }
    }

    pub fn add_detector(
        &mut self,
        detector_type: DetectorType,
        name: &str,
        predicate: FilePredicate,
        creator: DetectableCreator,
    ) -> RuleId {
        let id = RuleId(self.rules.len());
        self.rules
            .push(DetectorRule::new(detector_type, name, predicate, creator));
        id
    }

    /// Declares that `from` must be skipped when `to` is also applicable in
    /// the same directory. The evaluator resolves yields against the
    /// applicable set before any suppression, so two rules yielding to each
    /// other suppress both; keep yield relations one-directional.
    pub fn yield_to(&mut self, from: RuleId, to: RuleId) {
        self.yields.entry(from).or_default().push(to);
    }

    pub fn not_nestable(&mut self, rule: RuleId) {
        self.rules[rule.0].set_nestable(false);
    }

    pub fn name_version_priority(&mut self, rule: RuleId, priority: i32) {
        self.rules[rule.0].set_name_version_priority(priority);
    }

    pub fn build(self) -> DetectorRuleSet {
        DetectorRuleSet {
            rules: self.rules.into_iter().map(Arc::new).collect(),
            yields: self.yields,
        }
    }
}

impl Default for DetectorRuleSetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectable::{Applicability, Detectable, Extractability, Extraction};

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

    #[test]
    fn test_yield_relations_are_recorded() {
        let mut builder = DetectorRuleSet::builder();
        let lock = builder.add_detector(
            DetectorType::Npm,
            "Package Lock",
            FilePredicate::name("package-lock.json"),
            Box::new(|_| Box::new(NullDetectable)),
        );
        let cli = builder.add_detector(
            DetectorType::Npm,
            "Npm Cli",
            FilePredicate::name("package.json"),
            Box::new(|_| Box::new(NullDetectable)),
        );
        builder.yield_to(lock, cli);
        let rule_set = builder.build();

        assert_eq!(rule_set.len(), 2);
        assert_eq!(rule_set.yields_to(lock), &[cli]);
        assert!(rule_set.yields_to(cli).is_empty());
    }

    #[test]
    fn test_rule_flags() {
        let mut builder = DetectorRuleSet::builder();
        let pom = builder.add_detector(
            DetectorType::Maven,
            "Pom Xml",
            FilePredicate::name("pom.xml"),
            Box::new(|_| Box::new(NullDetectable)),
        );
        builder.not_nestable(pom);
        builder.name_version_priority(pom, 5);
        let rule_set = builder.build();

        let rule = rule_set.rule(pom);
        assert!(!rule.nestable());
        assert_eq!(rule.name_version_priority(), 5);
    }
}
