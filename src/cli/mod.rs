pub mod commands;
pub mod validate;
pub mod providers;
pub mod delete_seeds;

pub use commands::{Cli, Commands, ConfigArgs};

use std::path::Path;
use cloud_connector::config::{parse_settings, validate_settings, Settings};
use cloud_connector::ConnectorError;

/// Load the providers file and apply command-line overrides on top of it.
pub async fn load_settings(args: &ConfigArgs) -> Result<Settings, ConnectorError> {
    let mut settings = parse_settings(Path::new(&args.config)).await?;
    if args.dry_run {
        settings.dry_run = true;
    }
    if let Some(max) = args.max_concurrent_scans {
        settings.max_concurrent_scans = max;
    }
    validate_settings(&settings)?;
    Ok(settings)
}
