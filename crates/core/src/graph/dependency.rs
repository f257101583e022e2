use super::ExternalId;
use serde::{Deserialize, Serialize};

/// One resolved component in a dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub name: String,
    pub version: String,
    pub external_id: ExternalId,
}

impl Dependency {
    pub fn new(name: &str, version: &str, external_id: ExternalId) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            external_id,
        }
    }
}
