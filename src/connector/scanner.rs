use std::sync::Arc;
use async_trait::async_trait;
use crate::config::ProviderSettings;
use crate::errors::ConnectorError;
use crate::models::{CloudAsset, Seed};
use super::events::EventExtras;
use super::orchestrator::CloudConnector;

/// Enumerates one resource type of a provider account and reports what it
/// finds through the [`ScanContext`].
#[async_trait]
pub trait Scanner: Send + Sync {
    async fn scan(&self, ctx: &ScanContext<'_>) -> anyhow::Result<()>;
}

/// What a scanner invocation gets: the connector to report into, the
/// account being scanned, the resource type this invocation is for and the
/// values the cycle was started with.
pub struct ScanContext<'a> {
    connector: &'a CloudConnector,
    provider_settings: &'a ProviderSettings,
    resource_type: &'a str,
    extras: &'a EventExtras,
}

impl<'a> ScanContext<'a> {
    pub fn new(
        connector: &'a CloudConnector,
        provider_settings: &'a ProviderSettings,
        resource_type: &'a str,
        extras: &'a EventExtras,
    ) -> Self {
        Self { connector, provider_settings, resource_type, extras }
    }

    pub fn connector(&self) -> &'a CloudConnector {
        self.connector
    }

    pub fn provider_settings(&self) -> &'a ProviderSettings {
        self.provider_settings
    }

    pub fn resource_type(&self) -> &'a str {
        self.resource_type
    }

    /// Values passed to [`CloudConnector::scan_with`]; empty for a plain scan.
    pub fn extras(&self) -> &'a EventExtras {
        self.extras
    }

    /// Unprefixed `"<account>/<location>"` label; the connector adds its prefix.
    pub fn label_for(&self, location: &str) -> String {
        self.provider_settings.label_for(location)
    }

    pub fn add_seed(&self, seed: Seed) -> Result<(), ConnectorError> {
        self.add_seed_with(seed, EventExtras::new())
    }

    pub fn add_seed_with(&self, seed: Seed, extras: EventExtras) -> Result<(), ConnectorError> {
        self.connector.add_seed(seed, Some(self.resource_type), extras)
    }

    pub fn add_cloud_asset(&self, asset: CloudAsset) -> Result<(), ConnectorError> {
        self.add_cloud_asset_with(asset, EventExtras::new())
    }

    pub fn add_cloud_asset_with(&self, asset: CloudAsset, extras: EventExtras) -> Result<(), ConnectorError> {
        self.connector.add_cloud_asset(asset, Some(self.resource_type), extras)
    }
}

/// Ordered mapping from resource type to scanner. Registration order is the
/// order scanners are scheduled in.
#[derive(Clone, Default)]
pub struct ScannerSet {
    entries: Vec<(String, Arc<dyn Scanner>)>,
}

impl ScannerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registering a resource type twice replaces the earlier scanner in place.
    pub fn register(&mut self, resource_type: &str, scanner: impl Scanner + 'static) -> &mut Self {
        let scanner: Arc<dyn Scanner> = Arc::new(scanner);
        match self.entries.iter_mut().find(|(rt, _)| rt == resource_type) {
            Some(entry) => entry.1 = scanner,
            None => self.entries.push((resource_type.to_string(), scanner)),
        }
        self
    }

    pub fn with(mut self, resource_type: &str, scanner: impl Scanner + 'static) -> Self {
        self.register(resource_type, scanner);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn resource_types(&self) -> Vec<&str> {
        self.entries.iter().map(|(rt, _)| rt.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn Scanner>)> {
        self.entries.iter().map(|(rt, s)| (rt.as_str(), s))
    }
}

impl std::fmt::Debug for ScannerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.entries.iter().map(|(rt, _)| rt)).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop;

    #[async_trait]
    impl Scanner for Noop {
        async fn scan(&self, _ctx: &ScanContext<'_>) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_registration_order_preserved() {
        let set = ScannerSet::new()
            .with("ip_addresses", Noop)
            .with("clusters", Noop)
            .with("sql_servers", Noop);
        assert_eq!(set.resource_types(), vec!["ip_addresses", "clusters", "sql_servers"]);
    }

    #[test]
    fn test_reregistering_replaces_in_place() {
        let mut set = ScannerSet::new();
        set.register("a", Noop).register("b", Noop).register("a", Noop);
        assert_eq!(set.len(), 2);
        assert_eq!(set.resource_types(), vec!["a", "b"]);
    }

    #[test]
    fn test_empty_set() {
        let set = ScannerSet::new();
        assert!(set.is_empty());
        assert_eq!(format!("{:?}", set), "[]");
    }
}
