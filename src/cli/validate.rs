use cloud_connector::ConnectorError;
use super::commands::ConfigArgs;
use super::load_settings;

pub async fn handle_validate(args: ConfigArgs) -> Result<(), ConnectorError> {
    let settings = load_settings(&args).await?;
    println!("Configuration is valid: {}", args.config);
    if settings.dry_run {
        println!("Dry run: enabled");
    }
    println!("Max concurrent scans: {}", settings.max_concurrent_scans);
    println!("Accounts: {}", settings.providers.len());
    for provider in &settings.providers {
        println!("  {} {}", provider.provider.label(), provider.account);
    }
    Ok(())
}
