use super::WellFormednessChecker;
use crate::error::{Result, XmlScrubError};
use log::debug;
use std::path::Path;
use std::process::{Command, Stdio};

/// Runs `<command> <args..> <candidate>` and trusts its exit status.
/// Diagnostics on stdout and stderr are discarded.
pub struct ExternalChecker {
    command: String,
    args: Vec<String>,
}

impl ExternalChecker {
    pub fn new(command: String, args: Vec<String>) -> Self {
        Self { command, args }
    }
}

impl WellFormednessChecker for ExternalChecker {
    fn name(&self) -> &str {
        &self.command
    }

    fn check(&self, candidate: &Path) -> Result<bool> {
        let status = Command::new(&self.command)
            .args(&self.args)
            .arg(candidate)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| XmlScrubError::ValidatorUnavailable {
                command: self.command.clone(),
                source: e,
            })?;

        debug!(
            "{} exited with {} for {}",
            self.command,
            status,
            candidate.display()
        );

        Ok(status.success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_command_is_unavailable() {
        let temp_dir = TempDir::new().unwrap();
        let checker = ExternalChecker::new("xmlscrub-no-such-validator".to_string(), Vec::new());

        let err = checker.check(&temp_dir.path().join("a.xml")).unwrap_err();
        assert!(matches!(err, XmlScrubError::ValidatorUnavailable { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_status_decides() {
        let temp_dir = TempDir::new().unwrap();
        let candidate = temp_dir.path().join("a.xml");

        // `test -s FILE` succeeds only for a non-empty file
        let checker = ExternalChecker::new("test".to_string(), vec!["-s".to_string()]);

        std::fs::write(&candidate, "").unwrap();
        assert!(!checker.check(&candidate).unwrap());

        std::fs::write(&candidate, "<a/>").unwrap();
        assert!(checker.check(&candidate).unwrap());
    }
}
