use clap::Parser;
use closeline::adapter::inbound::cli::command::Cli;
use closeline::adapter::inbound::cli::execute::execute;
use closeline::infrastructure::config::settings::Config;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match Config::load_or_default(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(1);
        }
    };

    config.init_logging();
    info!("closeline starting");

    if let Err(e) = execute(&cli, &config).await {
        error!(error = %e, "Command failed");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
