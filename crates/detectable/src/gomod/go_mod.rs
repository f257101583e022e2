use anyhow::Context;
use bomscan_core::graph::{Dependency, DependencyGraph, ExternalId, Forge};
use bomscan_detector::{
    Applicability, CodeLocation, Detectable, DetectableEnvironment, Extractability, Extraction,
    ExtractionEnvironment,
};

/// Go detection by parsing go.mod directly: the module line names the
/// project, `require` entries become direct dependencies. go.mod only lists
/// direct requirements, so the graph has no edges.
pub struct GoModDetectable {
    environment: DetectableEnvironment,
}

impl GoModDetectable {
    pub fn new(environment: DetectableEnvironment) -> Self {
        Self { environment }
    }

    fn parse_require(line: &str) -> Option<(String, String)> {
        let line = line.split("//").next().unwrap_or("").trim();
        let mut parts = line.split_whitespace();
        let module = parts.next()?;
        let version = parts.next()?;
        if !version.starts_with('v') {
            return None;
        }
        Some((module.to_string(), version.to_string()))
    }
}

impl Detectable for GoModDetectable {
    fn applicable(&self) -> Applicability {
        if self.environment.has_file("go.mod") {
            Applicability::applicable()
        } else {
            Applicability::not_applicable("go.mod not found")
        }
    }

    fn extractable(&self) -> Extractability {
        Extractability::extractable()
    }

    fn extract(&self, _environment: &ExtractionEnvironment) -> anyhow::Result<Extraction> {
        let content = self
            .environment
            .read_file("go.mod")
            .context("Failed to read go.mod")?;

        let mut module_path = None;
        let mut graph = DependencyGraph::new();
        let mut in_require_block = false;

        for raw_line in content.lines() {
            let line = raw_line.split("//").next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }

            if in_require_block {
                if line == ")" {
                    in_require_block = false;
                } else if let Some((module, version)) = Self::parse_require(line) {
                    graph.add_direct(Dependency::new(
                        &module,
                        &version,
                        ExternalId::name_version(Forge::golang(), &module, &version),
                    ));
                }
                continue;
            }

            if let Some(rest) = line.strip_prefix("module ") {
                module_path = Some(rest.trim().to_string());
            } else if line == "require (" {
                in_require_block = true;
            } else if let Some(rest) = line.strip_prefix("require ") {
                if let Some((module, version)) = Self::parse_require(rest) {
                    graph.add_direct(Dependency::new(
                        &module,
                        &version,
                        ExternalId::name_version(Forge::golang(), &module, &version),
                    ));
                }
            }
        }

        // A module path names the project but carries no version.
        Ok(Extraction::success(vec![CodeLocation::new(graph)])
            .with_project(module_path, None))
    }
}
