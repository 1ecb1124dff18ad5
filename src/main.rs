use clap::Parser;
use expense_sheet::args::{Args, Command};
use expense_sheet::{commands, error_type, Config, ErrorType, Mode, Result};
use std::path::Path;
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
            match error_type(&e) {
                Some(error_type) => ExitCode::from(error_type.exit_code()),
                None => ExitCode::FAILURE,
            }
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().home().path();

    // This allows for testing the program without hitting the Google APIs. When
    // EXPENSE_SHEET_IN_TEST_MODE is set and non-zero in length, then the mode will be
    // Mode::Testing, otherwise it will be Mode::Google.
    let mode = Mode::from_env();

    let _: () = match args.command() {
        Command::Init(init_args) => commands::init(home, init_args).await?.print(),

        Command::Auth => commands::auth(&load_config(home).await?).await?.print(),

        Command::Add(add_args) => commands::add(load_config(home).await?, mode, add_args.clone())
            .await?
            .print(),

        Command::List(list_args) => {
            commands::list(load_config(home).await?, mode, list_args.clone())
                .await?
                .print()
        }

        Command::Report(report_args) => {
            commands::report(load_config(home).await?, mode, report_args.clone())
                .await?
                .print()
        }

        Command::Edit(edit_args) => {
            commands::edit(load_config(home).await?, mode, edit_args.clone())
                .await?
                .print()
        }

        Command::Delete(delete_args) => {
            commands::delete(load_config(home).await?, mode, delete_args.clone())
                .await?
                .print()
        }

        Command::Export(export_args) => {
            commands::export(load_config(home).await?, mode, export_args.clone())
                .await?
                .print()
        }

        Command::Apply(apply_args) => {
            commands::apply(load_config(home).await?, mode, apply_args.clone())
                .await?
                .print()
        }

        Command::Categories => commands::categories()?.print(),
    };
    Ok(())
}

async fn load_config(home: &Path) -> Result<Config> {
    Config::load(home)
        .await
        .map_err(|e| e.context(ErrorType::Config))
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
                "expense_sheet",
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
