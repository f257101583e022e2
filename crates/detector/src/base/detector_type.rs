use serde::{Deserialize, Serialize};
use std::fmt;

/// Package ecosystems the engine knows detector rules for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DetectorType {
    Npm,
    Maven,
    Cargo,
    Pip,
    GoMod,
    Gradle,
}

impl DetectorType {
    pub fn all() -> &'static [DetectorType] {
        &[
            DetectorType::Npm,
            DetectorType::Maven,
            DetectorType::Cargo,
            DetectorType::Pip,
            DetectorType::GoMod,
            DetectorType::Gradle,
        ]
    }

    pub fn parse(value: &str) -> Option<DetectorType> {
        DetectorType::all()
            .iter()
            .copied()
            .find(|t| t.to_string().eq_ignore_ascii_case(value))
    }
}

impl fmt::Display for DetectorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DetectorType::Npm => "NPM",
            DetectorType::Maven => "MAVEN",
            DetectorType::Cargo => "CARGO",
            DetectorType::Pip => "PIP",
            DetectorType::GoMod => "GO_MOD",
            DetectorType::Gradle => "GRADLE",
        };
        write!(f, "{}", name)
    }
}
