use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use std::process;
use xmlscrub::{Cli, OutputFormatter, OutputMode, UserFriendlyError, XmlScrub, XmlScrubError};

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();

    if let Err(e) = setup_logging(cli.verbosity_level(), cli.quiet) {
        eprintln!("Failed to initialize logging: {:#}", e);
        return 1;
    }

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let scrub = match XmlScrub::from_cli(&cli) {
        Ok(scrub) => scrub,
        Err(e) => {
            print_startup_error(&e);
            return 1;
        }
    };

    // Per-file problems are part of the report; only setup errors reach here.
    match scrub.run() {
        Ok(_report) => 0,
        Err(e) => {
            scrub.handle_error(&e);
            1
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "off"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init()
        .context("logger already initialized")
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "xmlscrub.toml".to_string());

    match XmlScrub::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  xmlscrub --config {}", config_path);
            println!("\nEdit the file to customize settings for your needs.");
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn print_startup_error(error: &XmlScrubError) {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}
