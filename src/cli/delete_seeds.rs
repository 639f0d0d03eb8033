use std::sync::Arc;
use cloud_connector::connector::{CloudConnector, ConnectorConfig, EventRegistry};
use cloud_connector::plugins::TracingPlugin;
use cloud_connector::{AsmClient, ConnectorError};
use super::commands::DeleteSeedsArgs;
use super::load_settings;
use tracing::info;

pub async fn handle_delete_seeds(args: DeleteSeedsArgs) -> Result<(), ConnectorError> {
    let settings = load_settings(&args.config).await?;
    let client = Arc::new(AsmClient::new(&settings.inventory)?);
    info!(endpoint = %settings.inventory.base_url, label = %args.label, "Deleting seeds");

    let mut events = EventRegistry::new();
    events.register_plugin(&TracingPlugin);
    let dry_run = settings.dry_run;
    let connector = CloudConnector::new(ConnectorConfig::new(&args.provider, Arc::new(settings)), client)?
        .with_events(Arc::new(events));

    connector.delete_seeds_by_label(&args.label).await?;
    if dry_run {
        println!("Dry run: seeds under '{}' were not deleted", args.label);
    } else {
        println!("Deleted seeds under '{}'", args.label);
    }
    Ok(())
}
