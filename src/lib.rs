pub mod cleaner;
pub mod cli;
pub mod config;
pub mod error;
pub mod sanitizer;
pub mod ui;
pub mod validator;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CleanupConfig, CliOverrides, Config, TargetConfig, ValidatorConfig};
pub use error::{Result, UserFriendlyError, XmlScrubError};

// Core functionality re-exports
pub use cleaner::{decode_lossy, CleanedText, DecodeMode, TextCleaner};
pub use sanitizer::{discover_candidates, FileOutcome, FileSanitizer, FileStatus, RunReport, SanitizeStep};
pub use ui::{OutputFormatter, OutputMode, ProgressManager};
pub use validator::{
    build_checker, BuiltinChecker, ExternalChecker, FnChecker, ValidatorKind, WellFormednessChecker,
};

use log::info;
use std::path::Path;

/// Main library interface for xmlscrub functionality
pub struct XmlScrub {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
    dry_run: bool,
}

impl XmlScrub {
    /// Create a new XmlScrub instance with the provided configuration
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);

        Self {
            config,
            output_formatter,
            progress_manager,
            dry_run: false,
        }
    }

    /// Create a new XmlScrub instance for testing (no progress bars)
    #[cfg(test)]
    pub fn new_for_test(config: Config) -> Self {
        Self {
            config,
            output_formatter: OutputFormatter::new(OutputMode::Plain, 0, true),
            progress_manager: ProgressManager::new(false),
            dry_run: false,
        }
    }

    /// Create XmlScrub instance from CLI arguments
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Ok(Self::new(config, output_mode, cli_args.verbosity_level(), cli_args.quiet)
            .with_dry_run(cli_args.dry_run))
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Build the per-file pipeline described by the configuration
    pub fn build_sanitizer(&self) -> Result<FileSanitizer> {
        self.config.validate()?;
        self.output_formatter.debug(&format!(
            "Temporary suffix '{}', decode mode {:?}",
            self.config.targets.temp_suffix, self.config.cleanup.decode
        ));

        let checker = build_checker(&self.config.validator);

        Ok(FileSanitizer::new(checker)?
            .with_decode_mode(self.config.cleanup.decode)
            .with_temp_suffix(self.config.targets.temp_suffix.clone())
            .with_dry_run(self.dry_run))
    }

    /// Clean every configured target that exists
    pub fn run(&self) -> Result<RunReport> {
        let sanitizer = self.build_sanitizer()?;
        Ok(self.run_with(&sanitizer))
    }

    /// Clean every configured target that exists with the given pipeline.
    /// Targets are processed one after another in configuration order.
    pub fn run_with(&self, sanitizer: &FileSanitizer) -> RunReport {
        let mut report = RunReport::new(self.dry_run);

        let files = discover_candidates(&self.config.targets.paths);
        if files.is_empty() {
            self.output_formatter.warning("No XML files found to clean");
            report.finish();
            self.output_formatter.print_run_summary(&report);
            return report;
        }

        if self.dry_run {
            self.output_formatter
                .info("DRY RUN MODE - original files will not be replaced");
        }
        self.output_formatter.start_operation(&format!(
            "Cleaning {} XML file(s) (checker: {})",
            files.len(),
            sanitizer.checker_name()
        ));

        let run_progress = self.progress_manager.create_run_progress(files.len() as u64);
        for path in &files {
            let outcome = self.process_file(sanitizer, path);
            report.record(outcome);
            run_progress.inc(1);
        }

        report.finish();
        ui::progress::finish_progress_with_summary(
            &run_progress,
            &format!("Processed {} files", report.attempted),
            report.duration,
        );
        info!(
            "Cleaned {}/{} files in {:?}",
            report.succeeded, report.attempted, report.duration
        );
        self.output_formatter.print_run_summary(&report);

        report
    }

    fn process_file(&self, sanitizer: &FileSanitizer, path: &Path) -> FileOutcome {
        let spinner = self
            .progress_manager
            .create_spinner(&format!("Processing {}", path.display()));

        let progress_callback = |step: SanitizeStep| {
            ui::progress::update_step_progress(&spinner, path, &step);
            if let SanitizeStep::Cleaned {
                chars_before,
                chars_after,
            } = step
            {
                self.progress_manager.suspend(|| {
                    self.output_formatter.info(&format!("Processing {}", path.display()));
                    self.output_formatter.print_char_counts(chars_before, chars_after);
                });
            }
        };

        let outcome = sanitizer.sanitize_with_progress(path, Some(&progress_callback));
        spinner.finish_and_clear();

        if outcome.chars_before.is_none() {
            self.output_formatter.info(&format!("Processing {}", path.display()));
        }
        self.output_formatter.print_file_outcome(&outcome);

        outcome
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config).map_err(XmlScrubError::Io)?;
        Ok(())
    }

    /// Get configuration reference
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &XmlScrubError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}
