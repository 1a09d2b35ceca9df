pub mod builtin;
pub mod external;

pub use builtin::BuiltinChecker;
pub use external::ExternalChecker;

use crate::config::ValidatorConfig;
use crate::error::{classify_io, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Decides whether a candidate file is well-formed XML.
///
/// The sanitizer only ever hands over the path of the temporary artifact it
/// just wrote, so implementations may assume the file is UTF-8.
pub trait WellFormednessChecker {
    /// Short label used in progress and log messages.
    fn name(&self) -> &str;

    /// `Ok(false)` means the content was rejected; `Err` means the check
    /// itself could not be carried out.
    fn check(&self, candidate: &Path) -> Result<bool>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ValidatorKind {
    /// Run an external command (xmllint by default)
    #[default]
    External,
    /// Parse in-process
    Builtin,
}

/// Adapts any `Fn(&str) -> bool` into a checker.
pub struct FnChecker<F> {
    name: String,
    predicate: F,
}

impl<F> FnChecker<F>
where
    F: Fn(&str) -> bool,
{
    pub fn new<S: Into<String>>(name: S, predicate: F) -> Self {
        Self {
            name: name.into(),
            predicate,
        }
    }
}

impl<F> WellFormednessChecker for FnChecker<F>
where
    F: Fn(&str) -> bool,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self, candidate: &Path) -> Result<bool> {
        let text = fs::read_to_string(candidate).map_err(|e| classify_io(e, candidate))?;
        Ok((self.predicate)(&text))
    }
}

pub fn build_checker(config: &ValidatorConfig) -> Box<dyn WellFormednessChecker> {
    match config.kind {
        ValidatorKind::External => Box::new(ExternalChecker::new(
            config.command.clone(),
            config.args.clone(),
        )),
        ValidatorKind::Builtin => Box::new(BuiltinChecker::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_fn_checker_sees_file_text() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("doc.xml.temp");
        fs::write(&path, "<ok/>").unwrap();

        let checker = FnChecker::new("stub", |text: &str| text == "<ok/>");
        assert_eq!(checker.name(), "stub");
        assert!(checker.check(&path).unwrap());

        fs::write(&path, "<nope>").unwrap();
        assert!(!checker.check(&path).unwrap());
    }

    #[test]
    fn test_fn_checker_missing_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let checker = FnChecker::new("stub", |_: &str| true);
        assert!(checker.check(&temp_dir.path().join("missing.xml")).is_err());
    }

    #[test]
    fn test_build_checker_by_kind() {
        let mut config = ValidatorConfig::default();
        assert_eq!(build_checker(&config).name(), "xmllint");

        config.kind = ValidatorKind::Builtin;
        assert_eq!(build_checker(&config).name(), "builtin");
    }
}
