use serde_json::json;
use cloud_connector::ConnectorError;
use super::commands::ProvidersArgs;
use super::load_settings;

pub async fn handle_providers(args: ProvidersArgs) -> Result<(), ConnectorError> {
    let settings = load_settings(&args.config).await?;

    if args.json {
        let accounts: Vec<_> = settings
            .providers
            .iter()
            .map(|p| {
                json!({
                    "provider": p.provider,
                    "account": p.account,
                    "label_prefix": p.provider.label_prefix(),
                    "regions": p.regions,
                    "ignore": p.ignore,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&accounts)?);
        return Ok(());
    }

    if settings.providers.is_empty() {
        println!("No provider accounts configured in {}", args.config.config);
        return Ok(());
    }

    for p in &settings.providers {
        println!("{}{}", p.provider.label_prefix(), p.account);
        if !p.regions.is_empty() {
            println!("  regions: {}", p.regions.join(", "));
        }
        if !p.ignore.is_empty() {
            let ignored: Vec<&str> = p.ignore.iter().map(String::as_str).collect();
            println!("  ignored: {}", ignored.join(", "));
        }
    }
    Ok(())
}
