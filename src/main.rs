mod cli;

use clap::Parser;
use cloud_connector::ConnectorError;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);
    if cli.json_logs {
        subscriber.json().init();
    } else {
        subscriber.with_ansi(!cli.no_color).init();
    }

    let result = match cli.command {
        cli::Commands::Validate(args) => cli::validate::handle_validate(args).await,
        cli::Commands::Providers(args) => cli::providers::handle_providers(args).await,
        cli::Commands::DeleteSeeds(args) => cli::delete_seeds::handle_delete_seeds(args).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        let exit_code = match &e {
            ConnectorError::Config(_) => 2,
            ConnectorError::Authentication(_) => 4,
            _ => 1,
        };
        std::process::exit(exit_code);
    }
}
