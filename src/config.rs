use crate::cleaner::DecodeMode;
use crate::error::{Result, XmlScrubError};
use crate::validator::ValidatorKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub targets: TargetConfig,
    pub cleanup: CleanupConfig,
    pub validator: ValidatorConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TargetConfig {
    pub paths: Vec<PathBuf>,
    pub temp_suffix: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CleanupConfig {
    pub decode: DecodeMode,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ValidatorConfig {
    pub kind: ValidatorKind,
    pub command: String,
    pub args: Vec<String>,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            paths: vec![
                PathBuf::from("data/consolidated.xml"),
                PathBuf::from("data/eu_sanctions.xml"),
            ],
            temp_suffix: ".temp".to_string(),
        }
    }
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            kind: ValidatorKind::External,
            command: "xmllint".to_string(),
            args: vec!["--noout".to_string()],
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(XmlScrubError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| XmlScrubError::Config {
                message: format!("Failed to read config file {}: {}", path.display(), e),
            })?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| XmlScrubError::Config {
                message: format!("Failed to parse config file {}: {}", path.display(), e),
            })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["xmlscrub.toml", ".xmlscrub.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref paths) = cli_args.paths {
            self.targets.paths = paths.clone();
        }

        if let Some(ref suffix) = cli_args.temp_suffix {
            self.targets.temp_suffix = suffix.clone();
        }

        if let Some(decode) = cli_args.decode {
            self.cleanup.decode = decode;
        }

        if let Some(kind) = cli_args.validator {
            self.validator.kind = kind;
        }

        if let Some(ref line) = cli_args.validator_command {
            // an explicit command implies the external checker
            let mut parts = line.split_whitespace().map(str::to_string);
            self.validator.command = parts.next().unwrap_or_default();
            self.validator.args = parts.collect();
            self.validator.kind = ValidatorKind::External;
        }
    }

    pub fn validate(&self) -> Result<()> {
        let suffix = &self.targets.temp_suffix;
        if suffix.is_empty() {
            return Err(XmlScrubError::Config {
                message: "Temporary file suffix must not be empty".to_string(),
            });
        }

        // the artifact has to stay a sibling of the original for rename to be atomic
        if suffix.contains('/') || suffix.contains('\\') {
            return Err(XmlScrubError::Config {
                message: format!("Temporary file suffix cannot contain path separators: {}", suffix),
            });
        }

        if self.targets.paths.iter().any(|p| p.as_os_str().is_empty()) {
            return Err(XmlScrubError::Config {
                message: "Target paths must not be empty".to_string(),
            });
        }

        if self.validator.kind == ValidatorKind::External && self.validator.command.trim().is_empty() {
            return Err(XmlScrubError::Config {
                message: "An external validator command must be specified".to_string(),
            });
        }

        Ok(())
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub paths: Option<Vec<PathBuf>>,
    pub temp_suffix: Option<String>,
    pub decode: Option<DecodeMode>,
    pub validator: Option<ValidatorKind>,
    pub validator_command: Option<String>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_paths(mut self, paths: Option<Vec<PathBuf>>) -> Self {
        self.paths = paths;
        self
    }

    pub fn with_temp_suffix(mut self, suffix: Option<String>) -> Self {
        self.temp_suffix = suffix;
        self
    }

    pub fn with_decode(mut self, decode: Option<DecodeMode>) -> Self {
        self.decode = decode;
        self
    }

    pub fn with_validator(mut self, validator: Option<ValidatorKind>) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_validator_command(mut self, command: Option<String>) -> Self {
        self.validator_command = command;
        self
    }
}
