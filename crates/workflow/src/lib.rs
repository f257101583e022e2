//! Orchestration around the detector engine: runs the finder and the three
//! evaluation phases, assembles code locations, decides a project
//! name/version suggestion, and publishes phase-completion events.

pub mod codelocation;
pub mod error;
pub mod event;
pub mod project;
pub mod result;
pub mod tool;

pub use codelocation::DetectCodeLocation;
pub use error::DetectUserFriendlyError;
pub use event::{DetectorEventListener, EventSystem, LoggingStatusListener};
pub use project::NameVersion;
pub use result::DetectorToolResult;
pub use tool::{DetectorTool, DetectorToolOptions};
