use anyhow::Context;
use bomscan_core::executable::{run_executable, ExecutableResolver};
use bomscan_core::graph::{Dependency, DependencyGraph, ExternalId, Forge};
use bomscan_detector::{
    Applicability, CodeLocation, Detectable, DetectableEnvironment, Extractability, Extraction,
    ExtractionEnvironment,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Resolves the installed dependency tree by invoking `npm ls --json --all`.
/// Needs an npm executable on the path; without one the detectable reports
/// itself not extractable so the lockfile-based detectables can stand in.
pub struct NpmCliDetectable {
    environment: DetectableEnvironment,
    resolver: Arc<dyn ExecutableResolver>,
}

impl NpmCliDetectable {
    pub fn new(environment: DetectableEnvironment, resolver: Arc<dyn ExecutableResolver>) -> Self {
        Self {
            environment,
            resolver,
        }
    }

    fn add_children(graph: &mut DependencyGraph, parent: Option<&ExternalId>, node: &Value) {
        let dependencies = match node["dependencies"].as_object() {
            Some(deps) => deps,
            None => return,
        };

        for (name, info) in dependencies {
            let version = match info["version"].as_str() {
                Some(version) => version,
                None => {
                    debug!(package = %name, "npm ls entry has no resolved version, skipping");
                    continue;
                }
            };
            let id = ExternalId::name_version(Forge::npmjs(), name, version);
            let dependency = Dependency::new(name, version, id.clone());
            match parent {
                Some(parent_id) => graph.add_child(parent_id, dependency),
                None => graph.add_direct(dependency),
            }
            Self::add_children(graph, Some(&id), info);
        }
    }
}

impl Detectable for NpmCliDetectable {
    fn applicable(&self) -> Applicability {
        if self.environment.has_file("package.json") {
            Applicability::applicable()
        } else {
            Applicability::not_applicable("package.json not found")
        }
    }

    fn extractable(&self) -> Extractability {
        match self.resolver.resolve("npm") {
            Some(_) => Extractability::extractable(),
            None => Extractability::not_extractable("No npm executable was found on the PATH"),
        }
    }

    fn extract(&self, _environment: &ExtractionEnvironment) -> anyhow::Result<Extraction> {
        let npm = self
            .resolver
            .resolve("npm")
            .context("npm executable disappeared between preparation and extraction")?;

        let output = run_executable(
            self.environment.directory(),
            &npm,
            &["ls", "--json", "--all"],
        )
        .context("Failed to invoke npm")?;

        // npm ls exits non-zero for peer-dependency problems but still prints
        // the tree, so only an empty stdout is treated as a failure.
        if output.stdout.trim().is_empty() {
            return Ok(Extraction::failure(format!(
                "npm ls produced no output (exit code {:?}): {}",
                output.exit_code,
                output.stderr.trim()
            )));
        }

        let tree: Value = match serde_json::from_str(&output.stdout) {
            Ok(value) => value,
            Err(err) => {
                return Ok(Extraction::failure(format!(
                    "npm ls output was not valid JSON: {}",
                    err
                )))
            }
        };

        let mut graph = DependencyGraph::new();
        Self::add_children(&mut graph, None, &tree);

        let name = tree["name"].as_str().map(str::to_string);
        let version = tree["version"].as_str().map(str::to_string);

        let mut code_location = CodeLocation::new(graph);
        if let (Some(name), Some(version)) = (&name, &version) {
            code_location = code_location
                .with_external_id(ExternalId::name_version(Forge::npmjs(), name, version));
        }

        Ok(Extraction::success(vec![code_location]).with_project(name, version))
    }
}
