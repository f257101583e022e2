use bomscan_core::ExitCodeType;
use thiserror::Error;

/// User-facing failure carrying an exit-code category. Only conditions fatal
/// to the whole run become this error; per-detector extraction failures are
/// absorbed into the result instead.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct DetectUserFriendlyError {
    pub message: String,
    pub exit_code: ExitCodeType,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl DetectUserFriendlyError {
    pub fn new(message: impl Into<String>, exit_code: ExitCodeType) -> Self {
        Self {
            message: message.into(),
            exit_code,
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        exit_code: ExitCodeType,
        source: anyhow::Error,
    ) -> Self {
        Self {
            message: message.into(),
            exit_code,
            source: Some(source),
        }
    }
}
