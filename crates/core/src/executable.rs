//! Resolution and invocation of external package-manager executables. The
//! engine treats these as an opaque "run command, capture output" capability.

use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Locates an executable by name. CLI-invoking detectables use this during
/// the extractable check; an unresolvable executable is an unmet
/// precondition, not an error.
pub trait ExecutableResolver: Send + Sync {
    fn resolve(&self, name: &str) -> Option<PathBuf>;
}

/// Resolves against the `PATH` of the current process.
pub struct SystemExecutableResolver;

impl SystemExecutableResolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemExecutableResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutableResolver for SystemExecutableResolver {
    fn resolve(&self, name: &str) -> Option<PathBuf> {
        let paths = env::var_os("PATH")?;
        for dir in env::split_paths(&paths) {
            let candidate = dir.join(name);
            if candidate.is_file() {
                debug!(executable = name, path = %candidate.display(), "Resolved executable");
                return Some(candidate);
            }
        }
        None
    }
}

#[derive(Debug)]
pub struct ExecutableOutput {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ExecutableOutput {
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs an executable in `working_dir`, blocking until exit, capturing both
/// streams. Spawn failure is an error; a non-zero exit is not.
pub fn run_executable(working_dir: &Path, executable: &Path, args: &[&str]) -> Result<ExecutableOutput> {
    debug!(
        executable = %executable.display(),
        ?args,
        working_dir = %working_dir.display(),
        "Running executable"
    );

    let output = Command::new(executable)
        .args(args)
        .current_dir(working_dir)
        .output()
        .context(format!("Failed to run executable {:?}", executable))?;

    Ok(ExecutableOutput {
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct FixedResolver(PathBuf);

    impl ExecutableResolver for FixedResolver {
        fn resolve(&self, name: &str) -> Option<PathBuf> {
            let candidate = self.0.join(name);
            candidate.is_file().then_some(candidate)
        }
    }

    #[test]
    fn test_resolver_misses_absent_executable() {
        let temp = TempDir::new().unwrap();
        let resolver = FixedResolver(temp.path().to_path_buf());
        assert!(resolver.resolve("definitely-not-a-tool").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_run_executable_captures_output() {
        let temp = TempDir::new().unwrap();
        let output = run_executable(temp.path(), Path::new("/bin/sh"), &["-c", "echo hello"]).unwrap();
        assert!(output.succeeded());
        assert_eq!(output.stdout.trim(), "hello");
    }

    #[cfg(unix)]
    #[test]
    fn test_run_executable_nonzero_exit_is_not_an_error() {
        let temp = TempDir::new().unwrap();
        let output = run_executable(temp.path(), Path::new("/bin/sh"), &["-c", "exit 3"]).unwrap();
        assert!(!output.succeeded());
        assert_eq!(output.exit_code, Some(3));
    }
}
