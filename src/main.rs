use clap::Parser;
use dblyser::cli::dispatcher::Dispatcher;
use dblyser::cli::main_types::Cli;
use dblyser::storage::app_config_dir;
use dblyser::storage::config::{CONFIG_FILE_NAME, Config, SettingsOverrides};
use dblyser::utils::logging::init_tracing;
use dblyser::{AppError, Result};

#[tokio::main]
async fn main() {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        report(&e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Load Config
    let config_dir = app_config_dir(cli.config_dir.as_deref())?;
    let config = Config::load(&config_dir.join(CONFIG_FILE_NAME))?;

    let settings = config.resolve(
        SettingsOverrides {
            base_url: cli.base_url,
            webhook_url: cli.webhook_url,
        },
        &config_dir,
    )?;

    Dispatcher::new(settings).dispatch(cli.command).await
}

fn report(error: &AppError) {
    eprintln!("{} Error: {}", error.severity().emoji(), error);
    if let Some(hint) = error.troubleshooting_hint() {
        eprintln!("Hint: {}", hint);
    }
}
