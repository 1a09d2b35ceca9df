use super::WellFormednessChecker;
use crate::error::{classify_io, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// In-process well-formedness check backed by `roxmltree`.
///
/// Stricter than a shape check but looser than xmllint in a few corners:
/// external entities are never resolved.
#[derive(Debug, Default)]
pub struct BuiltinChecker;

impl BuiltinChecker {
    pub fn new() -> Self {
        Self
    }

    pub fn is_well_formed(text: &str) -> bool {
        let options = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..Default::default()
        };

        match roxmltree::Document::parse_with_options(text, options) {
            Ok(_) => true,
            Err(e) => {
                debug!("built-in parser rejected document at line {}: {}", e.pos().row, e);
                false
            }
        }
    }
}

impl WellFormednessChecker for BuiltinChecker {
    fn name(&self) -> &str {
        "builtin"
    }

    fn check(&self, candidate: &Path) -> Result<bool> {
        let text = fs::read_to_string(candidate).map_err(|e| classify_io(e, candidate))?;
        Ok(Self::is_well_formed(&text))
    }
}
