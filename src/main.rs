use chrono::Local;
use clap::Parser;
use fin::args::{Args, Command};
use fin::{commands, Config, ErrorType, IntoResult, PromptConfirm, Result};
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
            error!("Exiting with error: {e}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().fin_home().path();
    let json = args.common().json();
    let today = Local::now().date_naive();

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Init => commands::init(home).await?.print(json),

        Command::Add(add_args) => commands::add(load(home).await?, add_args.clone(), today)
            .await?
            .print(json),

        Command::Edit(edit_args) => commands::edit(load(home).await?, edit_args.clone())
            .await?
            .print(json),

        Command::Delete(delete_args) => {
            commands::delete(load(home).await?, delete_args.clone(), &PromptConfirm)
                .await?
                .print(json)
        }

        Command::Clear(clear_args) => {
            commands::clear(load(home).await?, clear_args.clone(), &PromptConfirm)
                .await?
                .print(json)
        }

        Command::List(filter_args) => commands::list(load(home).await?, filter_args.clone())
            .await?
            .print(json),

        Command::Summary => commands::summary(load(home).await?, today)
            .await?
            .print(json),

        Command::Months => commands::months(load(home).await?).await?.print(json),

        Command::Categories(categories_args) => {
            commands::categories(load(home).await?, categories_args.clone())
                .await?
                .print(json)
        }

        Command::Monthly(filter_args) => {
            commands::monthly(load(home).await?, filter_args.clone())
                .await?
                .print(json)
        }

        Command::Export(export_args) => {
            commands::export(load(home).await?, export_args.clone(), today)
                .await?
                .print(json)
        }

        Command::Import(import_args) => commands::import(load(home).await?, import_args.clone())
            .await?
            .print(json),

        Command::Theme(theme_args) => commands::theme(load(home).await?, theme_args.clone())
            .await?
            .print(json),
    };
    Ok(())
}

async fn load(home: &Path) -> Result<Config> {
    Config::load(home).await.pub_result(ErrorType::Config)
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
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), level))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
