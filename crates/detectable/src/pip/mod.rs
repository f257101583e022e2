//! Pip detection from requirements.txt. Requirements files declare ranges,
//! not a resolved set, so only `==` pins carry a version; everything else is
//! reported as unresolved. No project identity exists in a requirements file,
//! which makes this the detectable that exercises path-based id synthesis.

use anyhow::Context;
use bomscan_core::graph::{Dependency, DependencyGraph, ExternalId, Forge};
use bomscan_detector::{
    Applicability, CodeLocation, Detectable, DetectableEnvironment, Extractability, Extraction,
    ExtractionEnvironment,
};
use regex::Regex;

const UNRESOLVED_VERSION: &str = "unresolved";

pub struct RequirementsTxtDetectable {
    environment: DetectableEnvironment,
}

impl RequirementsTxtDetectable {
    pub fn new(environment: DetectableEnvironment) -> Self {
        Self { environment }
    }

    fn parse_line(requirement_re: &Regex, line: &str) -> Option<(String, Option<String>)> {
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() || line.starts_with('-') {
            return None;
        }

        let captures = requirement_re.captures(line)?;
        let name = captures.name("name")?.as_str().to_string();
        let version = match (captures.name("op"), captures.name("version")) {
            (Some(op), Some(version)) if op.as_str() == "==" => {
                Some(version.as_str().trim().to_string())
            }
            _ => None,
        };
        Some((name, version))
    }
}

impl Detectable for RequirementsTxtDetectable {
    fn applicable(&self) -> Applicability {
        if self.environment.has_file("requirements.txt") {
            Applicability::applicable()
        } else {
            Applicability::not_applicable("requirements.txt not found")
        }
    }

    fn extractable(&self) -> Extractability {
        Extractability::extractable()
    }

    fn extract(&self, _environment: &ExtractionEnvironment) -> anyhow::Result<Extraction> {
        let content = self
            .environment
            .read_file("requirements.txt")
            .context("Failed to read requirements.txt")?;

        // name[extras] <op> version, with extras and environment markers ignored.
        let requirement_re = Regex::new(
            r"^(?P<name>[A-Za-z0-9][A-Za-z0-9._-]*)(?:\[[^\]]*\])?\s*(?:(?P<op>==|>=|<=|~=|!=|>|<)\s*(?P<version>[^;,\s]+))?",
        )
        .context("Invalid requirements pattern")?;

        let mut graph = DependencyGraph::new();
        for line in content.lines() {
            if let Some((name, version)) = Self::parse_line(&requirement_re, line) {
                let version = version.unwrap_or_else(|| UNRESOLVED_VERSION.to_string());
                graph.add_direct(Dependency::new(
                    &name,
                    &version,
                    ExternalId::name_version(Forge::pypi(), &name, &version),
                ));
            }
        }

        // No name or version to offer; the code location identity is left for
        // the aggregation layer to synthesize from the path.
        Ok(Extraction::success(vec![CodeLocation::new(graph)]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bomscan_core::fs::MockFileSystem;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn environment(requirements: &str) -> DetectableEnvironment {
        let fs = MockFileSystem::new();
        let root = fs.root().to_path_buf();
        fs.add_file("requirements.txt", requirements);
        DetectableEnvironment::new(root, Arc::new(fs))
    }

    fn scratch() -> ExtractionEnvironment {
        ExtractionEnvironment::new(PathBuf::from("/tmp/scratch"))
    }

    #[test]
    fn test_pinned_and_ranged_requirements() {
        let env = environment(
            "# comment\n\
             requests==2.31.0\n\
             flask>=2.0\n\
             numpy\n\
             -r extra.txt\n\
             uvicorn[standard]==0.29.0\n",
        );
        let extraction = RequirementsTxtDetectable::new(env).extract(&scratch()).unwrap();
        assert!(extraction.was_successful());

        let graph = extraction.code_locations[0].dependency_graph();
        assert_eq!(graph.component_count(), 4);

        let requests = ExternalId::name_version(Forge::pypi(), "requests", "2.31.0");
        assert!(graph.has_component(&requests));
        let flask = ExternalId::name_version(Forge::pypi(), "flask", "unresolved");
        assert!(graph.has_component(&flask));
        let numpy = ExternalId::name_version(Forge::pypi(), "numpy", "unresolved");
        assert!(graph.has_component(&numpy));
        let uvicorn = ExternalId::name_version(Forge::pypi(), "uvicorn", "0.29.0");
        assert!(graph.has_component(&uvicorn));
    }

    #[test]
    fn test_no_external_id_is_supplied() {
        let env = environment("requests==2.31.0\n");
        let extraction = RequirementsTxtDetectable::new(env).extract(&scratch()).unwrap();
        assert!(extraction.code_locations[0].external_id().is_none());
        assert!(extraction.project_name.is_none());
    }

    #[test]
    fn test_trailing_comment_stripped() {
        let env = environment("requests==2.31.0  # pinned for CVE-2023-32681\n");
        let extraction = RequirementsTxtDetectable::new(env).extract(&scratch()).unwrap();
        let requests = ExternalId::name_version(Forge::pypi(), "requests", "2.31.0");
        assert!(extraction.code_locations[0].dependency_graph().has_component(&requests));
    }
}
