//! Report assembly and rendering for scan results, as JSON or
//! human-readable text.

use anyhow::{Context, Result};
use bomscan_detector::DetectorEvaluationStatus;
use bomscan_workflow::{DetectorToolResult, NameVersion};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Human,
}

/// One evaluation that got past the file-predicate check, with where it
/// ended up.
#[derive(Debug, Serialize)]
pub struct DetectorStatusEntry {
    pub directory: String,
    pub detector: String,
    pub detector_type: String,
    pub status: DetectorEvaluationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CodeLocationEntry {
    pub detector_type: String,
    pub external_id: String,
    pub source_path: String,
    pub component_count: usize,
}

#[derive(Debug, Serialize)]
pub struct ScanReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<NameVersion>,
    pub applicable_detector_types: Vec<String>,
    pub successful_detector_types: Vec<String>,
    pub failed_detector_types: Vec<String>,
    pub detectors: Vec<DetectorStatusEntry>,
    pub code_locations: Vec<CodeLocationEntry>,
}

/// Flattens a completed run into the report shape. Evaluations that never
/// matched their file predicate are omitted; they are the overwhelming
/// majority and say nothing. Suppressed evaluations stay in: their reason
/// ("Yielded to ...", "Deferred to a nested ...") explains why a matching
/// detector did not run.
pub fn build_report(scan_root: &Path, result: &DetectorToolResult) -> ScanReport {
    let detectors = result
        .root_evaluation
        .flatten()
        .into_iter()
        .filter(|e| e.status() != DetectorEvaluationStatus::NotSearched && e.predicate_matched())
        .map(|e| DetectorStatusEntry {
            directory: relative_display(scan_root, e.environment().directory()),
            detector: e.rule().name().to_string(),
            detector_type: e.rule().detector_type().to_string(),
            status: e.status(),
            reason: e.status_reason().map(str::to_string),
        })
        .collect();

    let code_locations = result
        .bom_tool_code_locations
        .iter()
        .map(|location| CodeLocationEntry {
            detector_type: location.detector_type.to_string(),
            external_id: location.external_id.to_string(),
            source_path: relative_display(scan_root, &location.source_path),
            component_count: location.dependency_graph.component_count(),
        })
        .collect();

    ScanReport {
        project: result.project_name_version.clone(),
        applicable_detector_types: result
            .applicable_detector_types
            .iter()
            .map(|t| t.to_string())
            .collect(),
        successful_detector_types: result
            .successful_detector_types
            .iter()
            .map(|t| t.to_string())
            .collect(),
        failed_detector_types: result
            .failed_detector_types
            .iter()
            .map(|t| t.to_string())
            .collect(),
        detectors,
        code_locations,
    }
}

fn relative_display(root: &Path, target: &Path) -> String {
    let relative = target.strip_prefix(root).unwrap_or(target);
    if relative.as_os_str().is_empty() {
        ".".to_string()
    } else {
        relative.display().to_string()
    }
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self, report: &ScanReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(report).context("Failed to serialize scan report")
            }
            OutputFormat::Human => Ok(self.format_human(report)),
        }
    }

    fn format_human(&self, report: &ScanReport) -> String {
        let mut out = String::new();

        match &report.project {
            Some(project) => {
                out.push_str(&format!(
                    "Project: {} {}\n",
                    project.name,
                    project.version.as_deref().unwrap_or("(no version)")
                ));
            }
            None => out.push_str("Project: (no suggestion)\n"),
        }

        out.push_str(&format!(
            "Applicable: {}\n",
            join_or_none(&report.applicable_detector_types)
        ));
        out.push_str(&format!(
            "Successful: {}\n",
            join_or_none(&report.successful_detector_types)
        ));
        if !report.failed_detector_types.is_empty() {
            out.push_str(&format!(
                "Failed: {}\n",
                report.failed_detector_types.join(", ")
            ));
        }

        out.push_str("\nDetectors:\n");
        if report.detectors.is_empty() {
            out.push_str("  (none matched)\n");
        }
        for entry in &report.detectors {
            out.push_str(&format!(
                "  {} / {} - {:?}",
                entry.directory, entry.detector, entry.status
            ));
            if let Some(reason) = &entry.reason {
                out.push_str(&format!(" ({})", reason));
            }
            out.push('\n');
        }

        out.push_str("\nCode locations:\n");
        if report.code_locations.is_empty() {
            out.push_str("  (none)\n");
        }
        for location in &report.code_locations {
            out.push_str(&format!(
                "  {} [{}] {} - {} components\n",
                location.source_path,
                location.detector_type,
                location.external_id,
                location.component_count
            ));
        }

        out
    }
}

fn join_or_none(values: &[String]) -> String {
    if values.is_empty() {
        "(none)".to_string()
    } else {
        values.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> ScanReport {
        ScanReport {
            project: Some(NameVersion {
                name: "webapp".to_string(),
                version: Some("2.4.0".to_string()),
            }),
            applicable_detector_types: vec!["NPM".to_string()],
            successful_detector_types: vec!["NPM".to_string()],
            failed_detector_types: Vec::new(),
            detectors: vec![DetectorStatusEntry {
                directory: ".".to_string(),
                detector: "Package Lock".to_string(),
                detector_type: "NPM".to_string(),
                status: DetectorEvaluationStatus::ExtractionSuccess,
                reason: None,
            }],
            code_locations: vec![CodeLocationEntry {
                detector_type: "NPM".to_string(),
                external_id: "npmjs:webapp/2.4.0".to_string(),
                source_path: ".".to_string(),
                component_count: 12,
            }],
        }
    }

    #[test]
    fn test_human_output_mentions_key_facts() {
        let output = OutputFormatter::new(OutputFormat::Human)
            .format(&sample_report())
            .unwrap();
        assert!(output.contains("Project: webapp 2.4.0"));
        assert!(output.contains("Package Lock"));
        assert!(output.contains("npmjs:webapp/2.4.0"));
        assert!(output.contains("12 components"));
    }

    #[test]
    fn test_json_output_is_valid() {
        let output = OutputFormatter::new(OutputFormat::Json)
            .format(&sample_report())
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["project"]["name"], "webapp");
        assert_eq!(value["code_locations"][0]["component_count"], 12);
    }

    #[test]
    fn test_relative_display() {
        let root = Path::new("/project");
        assert_eq!(relative_display(root, Path::new("/project")), ".");
        assert_eq!(relative_display(root, Path::new("/project/api")), "api");
        assert_eq!(
            relative_display(root, Path::new("/elsewhere")),
            "/elsewhere"
        );
    }
}
