use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum XmlScrubError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid cleanup pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Could not run validator '{command}': {source}")]
    ValidatorUnavailable {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to replace {path}: {source}")]
    CommitFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Permission denied: {path}")]
    Permission { path: String },

    #[error("Path validation failed: {path}")]
    InvalidPath { path: String },
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for XmlScrubError {
    fn user_message(&self) -> String {
        match self {
            XmlScrubError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            XmlScrubError::ValidatorUnavailable { command, source } => {
                format!("Validator '{}' could not be started: {}", command, source)
            }
            XmlScrubError::CommitFailed { path, source } => {
                format!("Could not replace {}: {}", path.display(), source)
            }
            XmlScrubError::Permission { path } => {
                format!("Permission denied accessing: {}", path)
            }
            XmlScrubError::InvalidPath { path } => {
                format!("Invalid file path: {}", path)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            XmlScrubError::Config { .. } => Some(
                "Check your configuration file syntax, or run with --generate-config to start from a sample.".to_string()
            ),
            XmlScrubError::ValidatorUnavailable { .. } => Some(
                "Install xmllint (libxml2-utils) or switch to the built-in checker with --validator builtin.".to_string()
            ),
            XmlScrubError::CommitFailed { .. } => Some(
                "The temporary file and the original must live on the same filesystem and the directory must be writable.".to_string()
            ),
            XmlScrubError::Permission { .. } => Some(
                "Ensure you have read/write permissions for the target files and their directory.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for XmlScrubError {
    fn from(error: toml::de::Error) -> Self {
        XmlScrubError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, XmlScrubError>;

/// Maps a raw IO error onto the friendlier variants where the kind is known.
pub(crate) fn classify_io(error: std::io::Error, path: &std::path::Path) -> XmlScrubError {
    match error.kind() {
        std::io::ErrorKind::PermissionDenied => XmlScrubError::Permission {
            path: path.display().to_string(),
        },
        _ => XmlScrubError::Io(error),
    }
}
