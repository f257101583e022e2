//! Cargo detection from Cargo.lock, with Cargo.toml supplying the project
//! identity. The lockfile pins every package, so the resulting graph is fully
//! resolved without running cargo.

use anyhow::Context;
use bomscan_core::graph::{Dependency, DependencyGraph, ExternalId, Forge};
use bomscan_detector::{
    Applicability, CodeLocation, Detectable, DetectableEnvironment, Extractability, Extraction,
    ExtractionEnvironment,
};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
struct CargoLock {
    #[serde(default)]
    package: Vec<LockPackage>,
}

#[derive(Debug, Deserialize)]
struct LockPackage {
    name: String,
    version: String,
    #[serde(default)]
    dependencies: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CargoManifest {
    package: Option<ManifestPackage>,
}

#[derive(Debug, Deserialize)]
struct ManifestPackage {
    name: Option<String>,
    version: Option<toml::Value>,
}

pub struct CargoLockDetectable {
    environment: DetectableEnvironment,
}

impl CargoLockDetectable {
    pub fn new(environment: DetectableEnvironment) -> Self {
        Self { environment }
    }

    /// Reads the project name and version out of Cargo.toml when present.
    /// `version.workspace = true` and a missing manifest both degrade to None.
    fn project_identity(&self) -> (Option<String>, Option<String>) {
        let content = match self.environment.read_file("Cargo.toml") {
            Ok(content) => content,
            Err(_) => return (None, None),
        };
        let manifest: CargoManifest = match toml::from_str(&content) {
            Ok(manifest) => manifest,
            Err(_) => return (None, None),
        };
        match manifest.package {
            Some(package) => {
                let version = package.version.and_then(|v| match v {
                    toml::Value::String(s) => Some(s),
                    _ => None,
                });
                (package.name, version)
            }
            None => (None, None),
        }
    }
}

impl Detectable for CargoLockDetectable {
    fn applicable(&self) -> Applicability {
        if self.environment.has_file("Cargo.lock") {
            Applicability::applicable()
        } else {
            Applicability::not_applicable("Cargo.lock not found")
        }
    }

    fn extractable(&self) -> Extractability {
        Extractability::extractable()
    }

    fn extract(&self, _environment: &ExtractionEnvironment) -> anyhow::Result<Extraction> {
        let content = self
            .environment
            .read_file("Cargo.lock")
            .context("Failed to read Cargo.lock")?;
        let lock: CargoLock = match toml::from_str(&content) {
            Ok(lock) => lock,
            Err(err) => {
                return Ok(Extraction::failure(format!(
                    "Cargo.lock is not valid TOML: {}",
                    err
                )))
            }
        };

        let (project_name, project_version) = self.project_identity();

        // Lock dependency entries name packages, optionally with a version for
        // disambiguation. Resolve names through this index.
        let by_name: HashMap<&str, &LockPackage> = lock
            .package
            .iter()
            .map(|p| (p.name.as_str(), p))
            .collect();

        let resolve = |spec: &str| -> Option<&LockPackage> {
            let name = spec.split_whitespace().next().unwrap_or(spec);
            by_name.get(name).copied()
        };

        let mut graph = DependencyGraph::new();
        let root = project_name
            .as_deref()
            .and_then(|name| by_name.get(name).copied());

        match root {
            Some(root) => {
                for spec in &root.dependencies {
                    if let Some(package) = resolve(spec) {
                        graph.add_direct(Dependency::new(
                            &package.name,
                            &package.version,
                            ExternalId::name_version(
                                Forge::crates(),
                                &package.name,
                                &package.version,
                            ),
                        ));
                    }
                }
            }
            // Without a root package every locked package is reported direct.
            None => {
                for package in &lock.package {
                    graph.add_direct(Dependency::new(
                        &package.name,
                        &package.version,
                        ExternalId::name_version(Forge::crates(), &package.name, &package.version),
                    ));
                }
            }
        }

        // Edges between locked packages; the root's own edges are already the
        // direct set, so it is skipped.
        for package in &lock.package {
            if root.map(|r| std::ptr::eq(r, package)).unwrap_or(false) {
                continue;
            }
            let parent_id =
                ExternalId::name_version(Forge::crates(), &package.name, &package.version);
            for spec in &package.dependencies {
                if let Some(child) = resolve(spec) {
                    graph.add_child(
                        &parent_id,
                        Dependency::new(
                            &child.name,
                            &child.version,
                            ExternalId::name_version(Forge::crates(), &child.name, &child.version),
                        ),
                    );
                }
            }
        }

        let mut code_location = CodeLocation::new(graph);
        if let (Some(name), Some(version)) = (&project_name, &project_version) {
            code_location = code_location
                .with_external_id(ExternalId::name_version(Forge::crates(), name, version));
        }

        Ok(Extraction::success(vec![code_location])
            .with_project(project_name, project_version))
    }
}
