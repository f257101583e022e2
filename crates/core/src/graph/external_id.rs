use serde::{Deserialize, Serialize};
use std::fmt;

/// A package forge: the namespace an external id is resolvable against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Forge {
    name: String,
    separator: String,
}

impl Forge {
    pub fn new(name: &str, separator: &str) -> Self {
        Self {
            name: name.to_string(),
            separator: separator.to_string(),
        }
    }

    pub fn npmjs() -> Self {
        Self::new("npmjs", "/")
    }

    pub fn maven() -> Self {
        Self::new("maven", ":")
    }

    pub fn crates() -> Self {
        Self::new("crates", "/")
    }

    pub fn pypi() -> Self {
        Self::new("pypi", "/")
    }

    pub fn golang() -> Self {
        Self::new("golang", "/")
    }

    /// Reserved forge for identities bomscan synthesizes itself from file
    /// paths when a detector did not supply one.
    pub fn bomscan() -> Self {
        Self::new("bomscan", "/")
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }
}

/// Forge-qualified identity of a component or code location. Value type;
/// equality and ordering are by content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExternalId {
    forge: Forge,
    pieces: Vec<String>,
}

impl ExternalId {
    pub fn name_version(forge: Forge, name: &str, version: &str) -> Self {
        Self {
            forge,
            pieces: vec![name.to_string(), version.to_string()],
        }
    }

    pub fn maven(group: &str, artifact: &str, version: &str) -> Self {
        Self {
            forge: Forge::maven(),
            pieces: vec![group.to_string(), artifact.to_string(), version.to_string()],
        }
    }

    /// Path-based fallback identity, rooted in a relative path.
    pub fn path(forge: Forge, relative_path: &str) -> Self {
        Self {
            forge,
            pieces: vec![relative_path.to_string()],
        }
    }

    pub fn forge(&self) -> &Forge {
        &self.forge
    }

    pub fn pieces(&self) -> &[String] {
        &self.pieces
    }

    pub fn display_name(&self) -> String {
        self.pieces.join(self.forge.separator())
    }
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.forge.name(), self.display_name())
    }
}
