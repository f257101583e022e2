use anyhow::Context;
use bomscan_core::graph::{Dependency, DependencyGraph, ExternalId, Forge};
use bomscan_detector::{
    Applicability, CodeLocation, Detectable, DetectableEnvironment, Extractability, Extraction,
    ExtractionEnvironment,
};

/// Parses declared dependencies straight out of package.json. The least
/// authoritative npm signal: declared ranges, no resolution.
pub struct PackageJsonDetectable {
    environment: DetectableEnvironment,
}

impl PackageJsonDetectable {
    pub fn new(environment: DetectableEnvironment) -> Self {
        Self { environment }
    }
}

impl Detectable for PackageJsonDetectable {
    fn applicable(&self) -> Applicability {
        if self.environment.has_file("package.json") {
            Applicability::applicable()
        } else {
            Applicability::not_applicable("package.json not found")
        }
    }

    fn extractable(&self) -> Extractability {
        Extractability::extractable()
    }

    fn extract(&self, _environment: &ExtractionEnvironment) -> anyhow::Result<Extraction> {
        let content = self
            .environment
            .read_file("package.json")
            .context("Failed to read package.json")?;
        let package: serde_json::Value = match serde_json::from_str(&content) {
            Ok(value) => value,
            Err(err) => return Ok(Extraction::failure(format!("package.json is not valid JSON: {}", err))),
        };

        let name = package["name"].as_str().map(str::to_string);
        let version = package["version"].as_str().map(str::to_string);

        let mut graph = DependencyGraph::new();
        for section in ["dependencies", "devDependencies"] {
            if let Some(deps) = package[section].as_object() {
                for (dep_name, range) in deps {
                    let declared = range.as_str().unwrap_or("*");
                    graph.add_direct(Dependency::new(
                        dep_name,
                        declared,
                        ExternalId::name_version(Forge::npmjs(), dep_name, declared),
                    ));
                }
            }
        }

        let mut code_location = CodeLocation::new(graph);
        if let (Some(name), Some(version)) = (&name, &version) {
            code_location = code_location
                .with_external_id(ExternalId::name_version(Forge::npmjs(), name, version));
        }

        Ok(Extraction::success(vec![code_location]).with_project(name, version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bomscan_core::fs::MockFileSystem;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn environment(content: &str) -> DetectableEnvironment {
        let fs = MockFileSystem::new();
        let root = fs.root().to_path_buf();
        fs.add_file("package.json", content);
        DetectableEnvironment::new(root, Arc::new(fs))
    }

    fn scratch() -> ExtractionEnvironment {
        ExtractionEnvironment::new(PathBuf::from("/tmp/scratch"))
    }

    #[test]
    fn test_extracts_declared_dependencies() {
        let env = environment(
            r#"{
                "name": "app-ui",
                "version": "2.0.0",
                "dependencies": { "react": "^18.2.0" },
                "devDependencies": { "vitest": "^1.0.0" }
            }"#,
        );
        let detectable = PackageJsonDetectable::new(env);
        assert!(detectable.applicable().is_applicable());

        let extraction = detectable.extract(&scratch()).unwrap();
        assert!(extraction.was_successful());
        assert_eq!(extraction.project_name.as_deref(), Some("app-ui"));
        assert_eq!(extraction.project_version.as_deref(), Some("2.0.0"));

        let location = &extraction.code_locations[0];
        assert_eq!(location.dependency_graph().component_count(), 2);
        assert!(location.external_id().is_some());
    }

    #[test]
    fn test_nameless_package_has_no_external_id() {
        let env = environment(r#"{ "dependencies": { "react": "^18.2.0" } }"#);
        let extraction = PackageJsonDetectable::new(env).extract(&scratch()).unwrap();
        assert!(extraction.was_successful());
        assert!(extraction.code_locations[0].external_id().is_none());
    }

    #[test]
    fn test_invalid_json_is_a_failure_not_an_exception() {
        let env = environment("not json at all");
        let extraction = PackageJsonDetectable::new(env).extract(&scratch()).unwrap();
        assert_eq!(
            extraction.result,
            bomscan_detector::ExtractionResultType::Failure
        );
        assert!(extraction.description.is_some());
    }

    #[test]
    fn test_not_applicable_without_package_json() {
        let fs = MockFileSystem::new();
        let root = fs.root().to_path_buf();
        let env = DetectableEnvironment::new(root, Arc::new(fs));
        assert!(!PackageJsonDetectable::new(env).applicable().is_applicable());
    }
}
