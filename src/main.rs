use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use questlog::cli::{self, Cli, Command};
use questlog::controller::ListController;
use questlog::error::AppError;
use questlog::remote::{ApiConfig, HttpTodoApi};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "questlog=warn".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let api = match build_api(cli.base_url.as_deref()) {
        Ok(api) => api,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(2);
        }
    };

    let controller = ListController::new(Arc::new(api));
    let command = cli.command.unwrap_or(Command::List);

    match cli::run(command, &controller).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn build_api(base_url: Option<&str>) -> Result<HttpTodoApi, AppError> {
    let config = match base_url {
        Some(url) => ApiConfig::new(url)?,
        None => ApiConfig::new_from_env()?,
    };
    HttpTodoApi::new(config)
}
