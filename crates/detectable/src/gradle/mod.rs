//! Gradle detection by scanning build.gradle / build.gradle.kts for
//! `group:artifact:version` dependency notation. A full resolution would need
//! the Gradle tooling API; the scan covers the common literal declarations.

use anyhow::Context;
use bomscan_core::graph::{Dependency, DependencyGraph, ExternalId};
use bomscan_detector::{
    Applicability, CodeLocation, Detectable, DetectableEnvironment, Extractability, Extraction,
    ExtractionEnvironment,
};
use regex::Regex;

const BUILD_FILES: [&str; 2] = ["build.gradle", "build.gradle.kts"];
const SETTINGS_FILES: [&str; 2] = ["settings.gradle", "settings.gradle.kts"];

pub struct GradleBuildDetectable {
    environment: DetectableEnvironment,
}

impl GradleBuildDetectable {
    pub fn new(environment: DetectableEnvironment) -> Self {
        Self { environment }
    }

    fn build_file(&self) -> Option<&'static str> {
        BUILD_FILES
            .iter()
            .copied()
            .find(|name| self.environment.has_file(name))
    }

    /// Pulls `rootProject.name` out of settings.gradle(.kts) when present.
    fn project_name(&self) -> Option<String> {
        let name_re =
            Regex::new(r#"rootProject\.name\s*=\s*["']([^"']+)["']"#).ok()?;
        for settings in SETTINGS_FILES {
            if let Ok(content) = self.environment.read_file(settings) {
                if let Some(captures) = name_re.captures(&content) {
                    return Some(captures[1].to_string());
                }
            }
        }
        None
    }
}

impl Detectable for GradleBuildDetectable {
    fn applicable(&self) -> Applicability {
        if self.build_file().is_some() {
            Applicability::applicable()
        } else {
            Applicability::not_applicable("Neither build.gradle nor build.gradle.kts found")
        }
    }

    fn extractable(&self) -> Extractability {
        Extractability::extractable()
    }

    fn extract(&self, _environment: &ExtractionEnvironment) -> anyhow::Result<Extraction> {
        let build_file = self
            .build_file()
            .context("Gradle build file disappeared between search and extraction")?;
        let content = self
            .environment
            .read_file(build_file)
            .with_context(|| format!("Failed to read {}", build_file))?;

        // implementation "group:artifact:version" and friends, both Groovy
        // and Kotlin quoting.
        let dependency_re = Regex::new(
            r#"(?m)^\s*(?:implementation|api|compileOnly|runtimeOnly|testImplementation|testRuntimeOnly)\s*\(?\s*["']([^:"']+):([^:"']+):([^:"']+)["']"#,
        )
        .context("Invalid gradle dependency pattern")?;

        let mut graph = DependencyGraph::new();
        for captures in dependency_re.captures_iter(&content) {
            let (group, artifact, version) = (&captures[1], &captures[2], &captures[3]);
            graph.add_direct(Dependency::new(
                artifact,
                version,
                ExternalId::maven(group, artifact, version),
            ));
        }

        Ok(Extraction::success(vec![CodeLocation::new(graph)])
            .with_project(self.project_name(), None))
    }
}
