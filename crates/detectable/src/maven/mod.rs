//! Maven detection from pom.xml. Declared `<dependencies>` become direct
//! dependencies; transitive resolution would need the Maven CLI and is out of
//! scope for the parse-based detectable.

use anyhow::Context;
use bomscan_core::graph::{Dependency, DependencyGraph, ExternalId};
use bomscan_detector::{
    Applicability, CodeLocation, Detectable, DetectableEnvironment, Extractability, Extraction,
    ExtractionEnvironment,
};
use roxmltree::{Document, Node};

const UNRESOLVED_VERSION: &str = "unresolved";

pub struct PomXmlDetectable {
    environment: DetectableEnvironment,
}

impl PomXmlDetectable {
    pub fn new(environment: DetectableEnvironment) -> Self {
        Self { environment }
    }

    fn child_text<'a>(node: Node<'a, 'a>, name: &str) -> Option<&'a str> {
        node.children()
            .find(|c| c.has_tag_name(name))
            .and_then(|c| c.text())
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

impl Detectable for PomXmlDetectable {
    fn applicable(&self) -> Applicability {
        if self.environment.has_file("pom.xml") {
            Applicability::applicable()
        } else {
            Applicability::not_applicable("pom.xml not found")
        }
    }

    fn extractable(&self) -> Extractability {
        Extractability::extractable()
    }

    fn extract(&self, _environment: &ExtractionEnvironment) -> anyhow::Result<Extraction> {
        let content = self
            .environment
            .read_file("pom.xml")
            .context("Failed to read pom.xml")?;
        let document = match Document::parse(&content) {
            Ok(document) => document,
            Err(err) => {
                return Ok(Extraction::failure(format!(
                    "pom.xml is not valid XML: {}",
                    err
                )))
            }
        };

        let project = document.root_element();
        let parent = project.children().find(|c| c.has_tag_name("parent"));

        // Group and version inherit from <parent> when the project omits them.
        let group_id = Self::child_text(project, "groupId")
            .or_else(|| parent.and_then(|p| Self::child_text(p, "groupId")));
        let artifact_id = Self::child_text(project, "artifactId");
        let version = Self::child_text(project, "version")
            .or_else(|| parent.and_then(|p| Self::child_text(p, "version")));

        let mut graph = DependencyGraph::new();
        if let Some(dependencies) = project.children().find(|c| c.has_tag_name("dependencies")) {
            for dependency in dependencies
                .children()
                .filter(|c| c.has_tag_name("dependency"))
            {
                let dep_group = match Self::child_text(dependency, "groupId") {
                    Some(group) => group,
                    None => continue,
                };
                let dep_artifact = match Self::child_text(dependency, "artifactId") {
                    Some(artifact) => artifact,
                    None => continue,
                };
                let dep_version =
                    Self::child_text(dependency, "version").unwrap_or(UNRESOLVED_VERSION);

                graph.add_direct(Dependency::new(
                    dep_artifact,
                    dep_version,
                    ExternalId::maven(dep_group, dep_artifact, dep_version),
                ));
            }
        }

        let external_id = match (group_id, artifact_id, version) {
            (Some(group), Some(artifact), Some(version)) => {
                Some(ExternalId::maven(group, artifact, version))
            }
            _ => None,
        };

        let mut code_location = CodeLocation::new(graph);
        if let Some(id) = external_id {
            code_location = code_location.with_external_id(id);
        }

        Ok(Extraction::success(vec![code_location]).with_project(
            artifact_id.map(str::to_string),
            version.map(str::to_string),
        ))
    }
}
