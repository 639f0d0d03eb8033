use std::collections::HashSet;
use std::path::Path;
use crate::errors::ConnectorError;
use super::credentials::resolve_credential;
use super::schema::SETTINGS_SCHEMA;
use super::types::Settings;
use tracing::warn;

const MAX_SETTINGS_BYTES: u64 = 1_048_576;

pub async fn parse_settings(path: &Path) -> Result<Settings, ConnectorError> {
    if !path.exists() {
        return Err(ConnectorError::Config(format!("Settings file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > MAX_SETTINGS_BYTES {
        return Err(ConnectorError::Config("Settings file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    parse_settings_str(&content)
}

pub fn parse_settings_str(content: &str) -> Result<Settings, ConnectorError> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;

    // JSON Schema validation
    validate_schema(&yaml)?;

    let mut settings: Settings = serde_yaml::from_value(yaml)?;
    settings.inventory.api_key = resolve_credential(&settings.inventory.api_key);

    validate_settings(&settings)?;

    Ok(settings)
}

/// Check the raw document against the JSON schema. Violations are reported
/// as warnings; the typed parse and semantic checks decide what is fatal.
fn validate_schema(yaml: &serde_yaml::Value) -> Result<(), ConnectorError> {
    let json_str = serde_json::to_string(yaml)
        .map_err(|e| ConnectorError::Config(format!("Settings conversion error: {}", e)))?;
    let json_value: serde_json::Value = serde_json::from_str(&json_str)
        .map_err(|e| ConnectorError::Config(format!("Settings conversion error: {}", e)))?;

    let compiled = jsonschema::JSONSchema::compile(&SETTINGS_SCHEMA)
        .map_err(|e| ConnectorError::Config(format!("Schema compilation error: {}", e)))?;

    let result = compiled.validate(&json_value);
    if let Err(errors) = result {
        for e in errors {
            warn!(validation_error = %format!("{} at {}", e, e.instance_path), "Settings schema warning");
        }
    }

    Ok(())
}

/// Semantic checks that make a settings file unusable.
pub fn validate_settings(settings: &Settings) -> Result<(), ConnectorError> {
    if settings.inventory.api_key.trim().is_empty() {
        return Err(ConnectorError::Config("inventory.api_key must be set".into()));
    }

    if settings.max_concurrent_scans == 0 {
        return Err(ConnectorError::Config("max_concurrent_scans must be at least 1".into()));
    }

    let mut seen = HashSet::new();
    for (i, provider) in settings.providers.iter().enumerate() {
        if provider.account.trim().is_empty() {
            return Err(ConnectorError::Config(format!(
                "providers[{}]: account must be set for {}",
                i, provider.provider
            )));
        }
        if !seen.insert((provider.provider, provider.account.as_str())) {
            return Err(ConnectorError::Config(format!(
                "Duplicate provider entry: {} account '{}'",
                provider.provider, provider.account
            )));
        }
        if provider.ignore.iter().any(|r| r.trim().is_empty()) {
            warn!(provider = %provider.provider, account = %provider.account, "Empty entry in ignore list");
        }
    }

    Ok(())
}
