//! Static detector rule descriptors: the file predicate that makes a rule a
//! candidate in a directory and the yield/nesting precedence relations.

mod predicate;
#[allow(clippy::module_inception)]
mod rule;
mod rule_set;

pub use predicate::{glob_to_regex, FilePredicate};
pub use rule::{DetectableCreator, DetectorRule};
pub use rule_set::{DetectorRuleSet, DetectorRuleSetBuilder, RuleId};
