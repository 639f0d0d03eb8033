use std::collections::HashMap;
use std::sync::Arc;
use serde::Serialize;
use tracing::{error, info, info_span, warn, Instrument};
use crate::config::{ProviderSettings, Settings};
use crate::errors::ConnectorError;
use crate::inventory::InventoryApi;
use crate::models::ProviderKind;
use super::events::EventRegistry;
use super::orchestrator::{CloudConnector, ConnectorConfig};
use super::scanner::ScannerSet;
use super::state::ScanSummary;

/// A cloud provider integration: the scanners to run for one of its accounts.
pub trait Platform: Send + Sync {
    fn provider(&self) -> ProviderKind;

    fn seed_scanners(&self, provider_settings: &ProviderSettings) -> ScannerSet;

    fn cloud_asset_scanners(&self, provider_settings: &ProviderSettings) -> ScannerSet;
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AccountStatus {
    Completed(ScanSummary),
    Failed { error: String },
    Skipped { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountOutcome {
    pub provider: ProviderKind,
    pub account: String,
    pub status: AccountStatus,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub accounts: Vec<AccountOutcome>,
}

impl RunReport {
    pub fn succeeded(&self) -> usize {
        self.count(|s| matches!(s, AccountStatus::Completed(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, AccountStatus::Failed { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, AccountStatus::Skipped { .. }))
    }

    fn count(&self, pred: impl Fn(&AccountStatus) -> bool) -> usize {
        self.accounts.iter().filter(|a| pred(&a.status)).count()
    }
}

/// Scans every configured account, one connector per account. A failing
/// account is logged and reported; the others still run.
pub struct ScanRunner {
    settings: Arc<Settings>,
    inventory: Arc<dyn InventoryApi>,
    events: Arc<EventRegistry>,
    platforms: HashMap<ProviderKind, Arc<dyn Platform>>,
}

impl ScanRunner {
    pub fn new(settings: Arc<Settings>, inventory: Arc<dyn InventoryApi>) -> Self {
        Self {
            settings,
            inventory,
            events: Arc::new(EventRegistry::new()),
            platforms: HashMap::new(),
        }
    }

    /// Freeze `events` for every connector this runner builds.
    pub fn with_events(mut self, events: EventRegistry) -> Self {
        self.events = Arc::new(events);
        self
    }

    pub fn with_platform(mut self, platform: impl Platform + 'static) -> Self {
        self.platforms.insert(platform.provider(), Arc::new(platform));
        self
    }

    pub fn platforms(&self) -> Vec<ProviderKind> {
        let mut kinds: Vec<_> = self.platforms.keys().copied().collect();
        kinds.sort_by_key(|k| k.label());
        kinds
    }

    fn connector_for(
        &self,
        platform: &dyn Platform,
        provider_settings: &ProviderSettings,
    ) -> Result<CloudConnector, ConnectorError> {
        let config = ConnectorConfig::new(provider_settings.provider.as_str(), self.settings.clone());
        Ok(CloudConnector::new(config, self.inventory.clone())?
            .with_events(self.events.clone())
            .with_seed_scanners(platform.seed_scanners(provider_settings))
            .with_cloud_asset_scanners(platform.cloud_asset_scanners(provider_settings)))
    }

    async fn scan_account(&self, provider_settings: &ProviderSettings) -> AccountStatus {
        let Some(platform) = self.platforms.get(&provider_settings.provider) else {
            warn!("No platform registered, skipping account");
            return AccountStatus::Skipped {
                reason: format!("no platform registered for {}", provider_settings.provider),
            };
        };

        let result = match self.connector_for(platform.as_ref(), provider_settings) {
            Ok(connector) => connector.scan(provider_settings).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(summary) => AccountStatus::Completed(summary),
            Err(e) => {
                error!(error = %e, "Account scan failed");
                AccountStatus::Failed { error: e.to_string() }
            }
        }
    }

    pub async fn scan_all(&self) -> RunReport {
        let mut report = RunReport::default();
        for provider_settings in &self.settings.providers {
            let span = info_span!(
                "account",
                provider = %provider_settings.provider,
                account = %provider_settings.account
            );
            let status = self.scan_account(provider_settings).instrument(span).await;
            report.accounts.push(AccountOutcome {
                provider: provider_settings.provider,
                account: provider_settings.account.clone(),
                status,
            });
        }
        info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            skipped = report.skipped(),
            "All scans finished"
        );
        report
    }
}
