use std::collections::{BTreeMap, BTreeSet};
use serde::{Deserialize, Serialize};
use crate::errors::RetryConfig;
use crate::models::ProviderKind;
use super::credentials::resolve_credential;

pub const DEFAULT_BASE_URL: &str = "https://app.censys.io/api";
pub const DEFAULT_MAX_CONCURRENT_SCANS: usize = 10;
pub const DEFAULT_MAX_RETRIES: u32 = 3;

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_user_agent() -> String {
    format!("cloud-connector/{}", env!("CARGO_PKG_VERSION"))
}

fn default_max_concurrent_scans() -> usize {
    DEFAULT_MAX_CONCURRENT_SCANS
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

/// Top-level settings shared by every connector in a run.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub inventory: InventorySettings,
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default = "default_max_concurrent_scans")]
    pub max_concurrent_scans: usize,
    #[serde(default)]
    pub providers: Vec<ProviderSettings>,
}

impl Settings {
    pub fn new(api_key: &str) -> Self {
        Self {
            inventory: InventorySettings::new(api_key),
            dry_run: false,
            max_concurrent_scans: DEFAULT_MAX_CONCURRENT_SCANS,
            providers: Vec::new(),
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_max_concurrent_scans(mut self, max: usize) -> Self {
        self.max_concurrent_scans = max;
        self
    }

    pub fn with_provider(mut self, provider: ProviderSettings) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn providers_for(&self, provider: ProviderKind) -> impl Iterator<Item = &ProviderSettings> {
        self.providers.iter().filter(move |p| p.provider == provider)
    }
}

#[derive(Clone, Deserialize, Serialize)]
pub struct InventorySettings {
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl InventorySettings {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig { max_retries: self.max_retries }
    }
}

impl std::fmt::Debug for InventorySettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InventorySettings")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

/// One provider account to scan.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderSettings {
    pub provider: ProviderKind,
    pub account: String,
    #[serde(default)]
    pub regions: Vec<String>,
    /// Resource types whose scanners are skipped for this account.
    #[serde(default)]
    pub ignore: BTreeSet<String>,
    #[serde(default)]
    pub credentials: BTreeMap<String, String>,
}

impl ProviderSettings {
    pub fn new(provider: ProviderKind, account: &str) -> Self {
        Self {
            provider,
            account: account.to_string(),
            regions: Vec::new(),
            ignore: BTreeSet::new(),
            credentials: BTreeMap::new(),
        }
    }

    pub fn ignoring(mut self, resource_type: &str) -> Self {
        self.ignore.insert(resource_type.to_string());
        self
    }

    pub fn with_credential(mut self, key: &str, value: &str) -> Self {
        self.credentials.insert(key.to_string(), value.to_string());
        self
    }

    pub fn is_ignored(&self, resource_type: &str) -> bool {
        self.ignore.contains(resource_type)
    }

    /// Credential value with `$VAR` references resolved from the environment.
    pub fn credential(&self, key: &str) -> Option<String> {
        self.credentials.get(key).map(|v| resolve_credential(v))
    }

    /// `"<account>/<location>"`, the unprefixed label scanners use for
    /// resources in a region.
    pub fn label_for(&self, location: &str) -> String {
        format!("{}/{}", self.account, location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults_from_yaml() {
        let settings: Settings = serde_yaml::from_str("inventory:\n  api_key: abc123\n").unwrap();
        assert!(!settings.dry_run);
        assert_eq!(settings.max_concurrent_scans, DEFAULT_MAX_CONCURRENT_SCANS);
        assert_eq!(settings.inventory.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.inventory.max_retries, DEFAULT_MAX_RETRIES);
        assert!(settings.providers.is_empty());
    }

    #[test]
    fn test_provider_settings_ignore() {
        let ps = ProviderSettings::new(ProviderKind::Azure, "sub-1").ignoring("storage_containers");
        assert!(ps.is_ignored("storage_containers"));
        assert!(!ps.is_ignored("dns_records"));
    }

    #[test]
    fn test_label_for() {
        let ps = ProviderSettings::new(ProviderKind::Azure, "sub-1");
        assert_eq!(ps.label_for("eastus"), "sub-1/eastus");
    }

    #[test]
    fn test_credential_resolves_env() {
        std::env::set_var("CLOUD_CONNECTOR_TEST_SECRET", "s3cr3t-value");
        let ps = ProviderSettings::new(ProviderKind::Azure, "sub-1")
            .with_credential("client_secret", "$CLOUD_CONNECTOR_TEST_SECRET");
        assert_eq!(ps.credential("client_secret").as_deref(), Some("s3cr3t-value"));
        assert_eq!(ps.credential("tenant_id"), None);
        std::env::remove_var("CLOUD_CONNECTOR_TEST_SECRET");
    }

    #[test]
    fn test_providers_for_filters_by_kind() {
        let settings = Settings::new("key")
            .with_provider(ProviderSettings::new(ProviderKind::Azure, "a"))
            .with_provider(ProviderSettings::new(ProviderKind::Gcp, "b"))
            .with_provider(ProviderSettings::new(ProviderKind::Azure, "c"));
        let accounts: Vec<_> = settings.providers_for(ProviderKind::Azure).map(|p| p.account.as_str()).collect();
        assert_eq!(accounts, vec!["a", "c"]);
    }

    #[test]
    fn test_inventory_debug_redacts_key() {
        let inv = InventorySettings::new("super-secret-key");
        let rendered = format!("{:?}", inv);
        assert!(!rendered.contains("super-secret-key"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
