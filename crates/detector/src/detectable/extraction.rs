use crate::base::DetectorType;
use bomscan_core::graph::{DependencyGraph, ExternalId};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// One unit of dependency data produced by a detector: a graph plus optional
/// identity and source-path overrides. Immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeLocation {
    dependency_graph: DependencyGraph,
    external_id: Option<ExternalId>,
    source_path: Option<PathBuf>,
}

impl CodeLocation {
    pub fn new(dependency_graph: DependencyGraph) -> Self {
        Self {
            dependency_graph,
            external_id: None,
            source_path: None,
        }
    }

    pub fn with_external_id(mut self, external_id: ExternalId) -> Self {
        self.external_id = Some(external_id);
        self
    }

    pub fn with_source_path(mut self, source_path: PathBuf) -> Self {
        self.source_path = Some(source_path);
        self
    }

    pub fn dependency_graph(&self) -> &DependencyGraph {
        &self.dependency_graph
    }

    pub fn external_id(&self) -> Option<&ExternalId> {
        self.external_id.as_ref()
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExtractionResultType {
    Success,
    Failure,
    Exception,
}

impl fmt::Display for ExtractionResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExtractionResultType::Success => "SUCCESS",
            ExtractionResultType::Failure => "FAILURE",
            ExtractionResultType::Exception => "EXCEPTION",
        };
        write!(f, "{}", name)
    }
}

/// Outcome of running one detectable's extraction.
#[derive(Debug)]
pub struct Extraction {
    pub result: ExtractionResultType,
    pub code_locations: Vec<CodeLocation>,
    pub project_name: Option<String>,
    pub project_version: Option<String>,
    pub description: Option<String>,
    pub error: Option<anyhow::Error>,
}

impl Extraction {
    pub fn success(code_locations: Vec<CodeLocation>) -> Self {
        Self {
            result: ExtractionResultType::Success,
            code_locations,
            project_name: None,
            project_version: None,
            description: None,
            error: None,
        }
    }

    pub fn with_project(mut self, name: Option<String>, version: Option<String>) -> Self {
        self.project_name = name;
        self.project_version = version;
        self
    }

    pub fn failure(description: impl Into<String>) -> Self {
        Self {
            result: ExtractionResultType::Failure,
            code_locations: Vec::new(),
            project_name: None,
            project_version: None,
            description: Some(description.into()),
            error: None,
        }
    }

    pub fn exception(error: anyhow::Error) -> Self {
        Self {
            result: ExtractionResultType::Exception,
            code_locations: Vec::new(),
            project_name: None,
            project_version: None,
            description: None,
            error: Some(error),
        }
    }

    pub fn was_successful(&self) -> bool {
        self.result == ExtractionResultType::Success
    }
}

/// Identifier assigned to an evaluation when it is selected for extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionId {
    detector_type: DetectorType,
    ordinal: usize,
}

impl ExtractionId {
    pub fn new(detector_type: DetectorType, ordinal: usize) -> Self {
        Self {
            detector_type,
            ordinal,
        }
    }

    pub fn detector_type(&self) -> DetectorType {
        self.detector_type
    }

    pub fn to_unique_string(&self) -> String {
        format!("{}-{}", self.detector_type, self.ordinal)
    }
}

/// Isolated scratch environment one extraction runs in. Each extraction gets
/// its own working directory; nothing is shared between evaluations.
#[derive(Debug, Clone)]
pub struct ExtractionEnvironment {
    output_directory: PathBuf,
}

impl ExtractionEnvironment {
    pub fn new(output_directory: PathBuf) -> Self {
        Self { output_directory }
    }

    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }
}
