use serde::{Deserialize, Serialize};

/// Process exit categories surfaced to the user. Per-detector extraction
/// failures are absorbed into the result and never map to an exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitCodeType {
    Success,
    FailureGeneral,
    FailureConfiguration,
    /// The detector search could not list a directory; the run was aborted
    /// before any evaluation.
    FailureDetector,
}

impl ExitCodeType {
    pub fn exit_code(self) -> i32 {
        match self {
            ExitCodeType::Success => 0,
            ExitCodeType::FailureGeneral => 1,
            ExitCodeType::FailureConfiguration => 2,
            ExitCodeType::FailureDetector => 3,
        }
    }
}
