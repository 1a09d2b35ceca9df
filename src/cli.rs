use crate::cleaner::DecodeMode;
use crate::config::{CliOverrides, Config};
use crate::error::Result;
use crate::validator::ValidatorKind;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "xmlscrub")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Repair XML feeds by removing control characters and escaping stray ampersands")]
#[command(
    long_about = "xmlscrub cleans each target file, writes the result next to it, checks that the \
                  result is well-formed XML and only then replaces the original."
)]
#[command(after_help = "EXAMPLES:\n  \
    xmlscrub\n  \
    xmlscrub data/feed.xml data/other.xml --validator builtin\n  \
    xmlscrub --validator-command \"xmlstarlet val --well-formed\"\n  \
    xmlscrub --config my-config.toml --dry-run -v")]
pub struct Cli {
    /// XML files to clean (defaults to the configured targets)
    pub paths: Vec<PathBuf>,

    /// Configuration file path
    #[arg(
        short,
        long,
        env = "XMLSCRUB_CONFIG",
        help = "Path to TOML configuration file"
    )]
    pub config: Option<PathBuf>,

    /// Well-formedness checker to use
    #[arg(long, value_enum)]
    pub validator: Option<ValidatorKind>,

    /// External checker command line
    #[arg(
        long,
        help = "External checker command, e.g. \"xmllint --noout\". Split on whitespace; \
                quoting is not supported, so use the [validator] args list in the config \
                file for arguments containing spaces"
    )]
    pub validator_command: Option<String>,

    /// Suffix appended to the temporary artifact
    #[arg(long, help = "Suffix for the temporary cleaned file (default: .temp)")]
    pub temp_suffix: Option<String>,

    /// How undecodable bytes are handled
    #[arg(long, value_enum)]
    pub decode: Option<DecodeMode>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (only the final summary and errors)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Dry run (clean and check without replacing anything)
    #[arg(long, help = "Clean and validate but leave the original files untouched")]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON lines
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        let paths = if self.paths.is_empty() {
            None
        } else {
            Some(self.paths.clone())
        };

        CliOverrides::new()
            .with_paths(paths)
            .with_temp_suffix(self.temp_suffix.clone())
            .with_decode(self.decode)
            .with_validator(self.validator)
            .with_validator_command(self.validator_command.clone())
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_cli() -> Cli {
        Cli {
            paths: Vec::new(),
            config: None,
            validator: None,
            validator_command: None,
            temp_suffix: None,
            decode: None,
            output_format: OutputFormat::Human,
            verbose: 0,
            quiet: false,
            dry_run: false,
            generate_config: false,
        }
    }

    #[test]
    fn test_no_paths_keeps_configured_targets() {
        let overrides = base_cli().create_cli_overrides();
        assert!(overrides.paths.is_none());
    }

    #[test]
    fn test_positional_paths_override() {
        let mut cli = base_cli();
        cli.paths = vec![PathBuf::from("feed.xml")];
        cli.validator = Some(ValidatorKind::Builtin);

        let overrides = cli.create_cli_overrides();
        assert_eq!(overrides.paths, Some(vec![PathBuf::from("feed.xml")]));
        assert_eq!(overrides.validator, Some(ValidatorKind::Builtin));
    }

    #[test]
    fn test_parse_arguments() {
        let cli = Cli::try_parse_from([
            "xmlscrub",
            "a.xml",
            "b.xml",
            "--validator",
            "builtin",
            "--decode",
            "replace",
            "--temp-suffix",
            ".tmp",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.paths.len(), 2);
        assert_eq!(cli.validator, Some(ValidatorKind::Builtin));
        assert_eq!(cli.decode, Some(DecodeMode::Replace));
        assert_eq!(cli.temp_suffix.as_deref(), Some(".tmp"));
        assert_eq!(cli.verbosity_level(), 2);
    }

    #[test]
    fn test_validator_command_help_mentions_splitting() {
        use clap::CommandFactory;

        let command = Cli::command();
        let arg = command
            .get_arguments()
            .find(|a| a.get_id() == "validator_command")
            .unwrap();
        assert!(arg.get_help().unwrap().to_string().contains("whitespace"));
    }

    #[test]
    fn test_config_path_from_environment() {
        let command = <Cli as clap::CommandFactory>::command();
        let arg = command
            .get_arguments()
            .find(|a| a.get_id() == "config")
            .unwrap();
        assert_eq!(arg.get_env(), Some(std::ffi::OsStr::new("XMLSCRUB_CONFIG")));
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["xmlscrub", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_quiet_verbosity() {
        let mut cli = base_cli();
        cli.quiet = true;
        cli.verbose = 3;
        assert_eq!(cli.verbosity_level(), 0);
    }

    #[test]
    fn test_load_config_rejects_bad_suffix() {
        let mut cli = base_cli();
        cli.temp_suffix = Some("".to_string());
        assert!(cli.load_config().is_err());
    }
}
