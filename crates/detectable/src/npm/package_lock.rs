use anyhow::Context;
use bomscan_core::graph::{Dependency, DependencyGraph, ExternalId, Forge};
use bomscan_detector::{
    Applicability, CodeLocation, Detectable, DetectableEnvironment, Extractability, Extraction,
    ExtractionEnvironment,
};
use serde_json::Value;

/// Builds a resolved dependency graph from package-lock.json. Handles the
/// flat `packages` map of lockfile v2/v3 and falls back to the nested
/// `dependencies` map of v1.
pub struct PackageLockDetectable {
    environment: DetectableEnvironment,
}

impl PackageLockDetectable {
    pub fn new(environment: DetectableEnvironment) -> Self {
        Self { environment }
    }

    fn parse_v2(packages: &serde_json::Map<String, Value>) -> DependencyGraph {
        let resolve = |name: &str| -> Option<String> {
            packages
                .get(&format!("node_modules/{}", name))
                .and_then(|p| p["version"].as_str())
                .map(str::to_string)
        };

        let mut graph = DependencyGraph::new();

        if let Some(root) = packages.get("") {
            for section in ["dependencies", "devDependencies"] {
                if let Some(deps) = root[section].as_object() {
                    for name in deps.keys() {
                        if let Some(version) = resolve(name) {
                            graph.add_direct(Dependency::new(
                                name,
                                &version,
                                ExternalId::name_version(Forge::npmjs(), name, &version),
                            ));
                        }
                    }
                }
            }
        }

        for (key, package) in packages {
            let parent_name = match key.rsplit_once("node_modules/") {
                Some((_, name)) => name,
                None => continue,
            };
            let parent_version = match package["version"].as_str() {
                Some(version) => version,
                None => continue,
            };
            let parent_id =
                ExternalId::name_version(Forge::npmjs(), parent_name, parent_version);
            if let Some(deps) = package["dependencies"].as_object() {
                for child_name in deps.keys() {
                    if let Some(child_version) = resolve(child_name) {
                        graph.add_child(
                            &parent_id,
                            Dependency::new(
                                child_name,
                                &child_version,
                                ExternalId::name_version(
                                    Forge::npmjs(),
                                    child_name,
                                    &child_version,
                                ),
                            ),
                        );
                    }
                }
            }
        }

        graph
    }

    fn parse_v1(dependencies: &serde_json::Map<String, Value>) -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        for (name, info) in dependencies {
            let version = match info["version"].as_str() {
                Some(version) => version,
                None => continue,
            };
            let id = ExternalId::name_version(Forge::npmjs(), name, version);
            graph.add_direct(Dependency::new(name, version, id.clone()));

            if let Some(requires) = info["requires"].as_object() {
                for child_name in requires.keys() {
                    if let Some(child_version) = dependencies
                        .get(child_name)
                        .and_then(|c| c["version"].as_str())
                    {
                        graph.add_child(
                            &id,
                            Dependency::new(
                                child_name,
                                child_version,
                                ExternalId::name_version(
                                    Forge::npmjs(),
                                    child_name,
                                    child_version,
                                ),
                            ),
                        );
                    }
                }
            }
        }
        graph
    }
}

impl Detectable for PackageLockDetectable {
    fn applicable(&self) -> Applicability {
        if self.environment.has_file("package-lock.json") {
            Applicability::applicable()
        } else {
            Applicability::not_applicable("package-lock.json not found")
        }
    }

    fn extractable(&self) -> Extractability {
        Extractability::extractable()
    }

    fn extract(&self, _environment: &ExtractionEnvironment) -> anyhow::Result<Extraction> {
        let content = self
            .environment
            .read_file("package-lock.json")
            .context("Failed to read package-lock.json")?;
        let lock: Value = match serde_json::from_str(&content) {
            Ok(value) => value,
            Err(err) => {
                return Ok(Extraction::failure(format!(
                    "package-lock.json is not valid JSON: {}",
                    err
                )))
            }
        };

        let graph = if let Some(packages) = lock["packages"].as_object() {
            Self::parse_v2(packages)
        } else if let Some(dependencies) = lock["dependencies"].as_object() {
            Self::parse_v1(dependencies)
        } else {
            DependencyGraph::new()
        };

        let name = lock["name"].as_str().map(str::to_string);
        let version = lock["version"].as_str().map(str::to_string);

        let mut code_location = CodeLocation::new(graph);
        if let (Some(name), Some(version)) = (&name, &version) {
            code_location = code_location
                .with_external_id(ExternalId::name_version(Forge::npmjs(), name, version));
        }

        Ok(Extraction::success(vec![code_location]).with_project(name, version))
    }
}
