use anyhow::Context;
use cash_audit::args::{Args, Command, Common};
use cash_audit::{commands, default_path, Config, Mode, Result};
use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let common = args.common();

    // This allows for running the program without network access. When CASH_AUDIT_IN_TEST_MODE
    // is set and non-empty, the mode will be Mode::Testing, otherwise it will be Mode::Http.
    let mode = Mode::from_env();

    let _: () = match args.command() {
        Command::Init(init_args) => {
            let path = match common.config() {
                Some(p) => p.to_path_buf(),
                None => default_path().context("Unable to find a config directory, use --config")?,
            };
            commands::init(
                &path,
                common.sources().to_vec(),
                init_args.mirror_prefix().map(String::from),
                init_args.brand_affixes().to_vec(),
            )
            .await?
            .print()
        }

        Command::Summary => commands::summary(load_config(common).await?, mode)
            .await?
            .print(),

        Command::List(list_args) => {
            commands::list(load_config(common).await?, mode, list_args.clone())
                .await?
                .print()
        }

        Command::Units => commands::units(load_config(common).await?, mode)
            .await?
            .print(),

        Command::Analysis(analysis_args) => {
            commands::analysis(load_config(common).await?, mode, analysis_args.clone())
                .await?
                .print()
        }
    };
    Ok(())
}

/// Loads the config file and applies the sources given on the command line.
async fn load_config(common: &Common) -> Result<Config> {
    Ok(Config::load(common.config())
        .await?
        .with_sources(common.sources().to_vec()))
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
