use anyhow::Context;
use bomscan_core::executable::{run_executable, ExecutableResolver};
use bomscan_core::graph::{Dependency, DependencyGraph, ExternalId, Forge};
use bomscan_detector::{
    Applicability, CodeLocation, Detectable, DetectableEnvironment, Extractability, Extraction,
    ExtractionEnvironment,
};
use std::sync::Arc;

/// Resolves the full module set by invoking `go list -m all`, which includes
/// transitive requirements the go.mod parse cannot see. The module graph is
/// reported flat; `go list` does not expose parent edges.
pub struct GoModCliDetectable {
    environment: DetectableEnvironment,
    resolver: Arc<dyn ExecutableResolver>,
}

impl GoModCliDetectable {
    pub fn new(environment: DetectableEnvironment, resolver: Arc<dyn ExecutableResolver>) -> Self {
        Self {
            environment,
            resolver,
        }
    }
}

impl Detectable for GoModCliDetectable {
    fn applicable(&self) -> Applicability {
        if self.environment.has_file("go.mod") {
            Applicability::applicable()
        } else {
            Applicability::not_applicable("go.mod not found")
        }
    }

    fn extractable(&self) -> Extractability {
        match self.resolver.resolve("go") {
            Some(_) => Extractability::extractable(),
            None => Extractability::not_extractable("No go executable was found on the PATH"),
        }
    }

    fn extract(&self, _environment: &ExtractionEnvironment) -> anyhow::Result<Extraction> {
        let go = self
            .resolver
            .resolve("go")
            .context("go executable disappeared between preparation and extraction")?;

        let output = run_executable(self.environment.directory(), &go, &["list", "-m", "all"])
            .context("Failed to invoke go")?;

        if !output.succeeded() {
            return Ok(Extraction::failure(format!(
                "go list -m all failed (exit code {:?}): {}",
                output.exit_code,
                output.stderr.trim()
            )));
        }

        let mut lines = output.stdout.lines();
        // First line is the main module itself.
        let module_path = lines.next().map(|l| l.trim().to_string());

        let mut graph = DependencyGraph::new();
        for line in lines {
            let mut parts = line.split_whitespace();
            let (module, version) = match (parts.next(), parts.next()) {
                (Some(module), Some(version)) => (module, version),
                _ => continue,
            };
            graph.add_direct(Dependency::new(
                module,
                version,
                ExternalId::name_version(Forge::golang(), module, version),
            ));
        }

        Ok(Extraction::success(vec![CodeLocation::new(graph)])
            .with_project(module_path, None))
    }
}
