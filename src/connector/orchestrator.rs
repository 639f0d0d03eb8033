use std::sync::Arc;
use std::time::Instant;
use futures::{stream, StreamExt, TryStreamExt};
use tokio::sync::RwLock;
use crate::config::{ProviderSettings, Settings};
use crate::errors::ConnectorError;
use crate::inventory::{InventoryApi, SubmissionGateway, SubmissionOutcome};
use crate::models::{CloudAsset, ProviderKind, Seed};
use super::accumulator::Accumulator;
use super::events::{EventContext, EventExtras, EventPayload, EventRegistry, EventType};
use super::scanner::{ScanContext, ScannerSet};
use super::state::{ScanState, ScanSummary, SubmissionReport};
use tracing::{debug, info};

/// What a connector is built from: the provider identifier as it appears in
/// configuration and the settings shared by the run.
#[derive(Debug, Clone)]
pub struct ConnectorConfig {
    pub provider: String,
    pub settings: Arc<Settings>,
}

impl ConnectorConfig {
    pub fn new(provider: &str, settings: Arc<Settings>) -> Self {
        Self { provider: provider.to_string(), settings }
    }
}

/// Drives one provider's scan cycles: runs its scanners, collects what they
/// report, notifies observers and hands the result to the inventory.
pub struct CloudConnector {
    provider: ProviderKind,
    label_prefix: String,
    settings: Arc<Settings>,
    gateway: SubmissionGateway,
    events: Arc<EventRegistry>,
    accumulator: Accumulator,
    seed_scanners: ScannerSet,
    cloud_asset_scanners: ScannerSet,
    state: RwLock<ScanState>,
}

impl CloudConnector {
    pub fn new(config: ConnectorConfig, inventory: Arc<dyn InventoryApi>) -> Result<Self, ConnectorError> {
        let provider: ProviderKind = config.provider.parse()?;
        if config.settings.max_concurrent_scans == 0 {
            return Err(ConnectorError::Config("max_concurrent_scans must be at least 1".into()));
        }

        Ok(Self {
            provider,
            label_prefix: provider.label_prefix(),
            settings: config.settings,
            gateway: SubmissionGateway::new(inventory),
            events: Arc::new(EventRegistry::new()),
            accumulator: Accumulator::new(),
            seed_scanners: ScannerSet::new(),
            cloud_asset_scanners: ScannerSet::new(),
            state: RwLock::new(ScanState::Idle),
        })
    }

    pub fn with_events(mut self, events: Arc<EventRegistry>) -> Self {
        self.events = events;
        self
    }

    pub fn with_seed_scanners(mut self, scanners: ScannerSet) -> Self {
        self.seed_scanners = scanners;
        self
    }

    pub fn with_cloud_asset_scanners(mut self, scanners: ScannerSet) -> Self {
        self.cloud_asset_scanners = scanners;
        self
    }

    pub fn provider(&self) -> ProviderKind {
        self.provider
    }

    pub fn label_prefix(&self) -> &str {
        &self.label_prefix
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn accumulator(&self) -> &Accumulator {
        &self.accumulator
    }

    pub fn events(&self) -> &EventRegistry {
        &self.events
    }

    pub fn seed_scanners(&self) -> &ScannerSet {
        &self.seed_scanners
    }

    pub fn cloud_asset_scanners(&self) -> &ScannerSet {
        &self.cloud_asset_scanners
    }

    pub async fn state(&self) -> ScanState {
        *self.state.read().await
    }

    async fn set_state(&self, state: ScanState) {
        *self.state.write().await = state;
    }

    pub fn dispatch_event(
        &self,
        event_type: EventType,
        service: Option<&str>,
        payload: EventPayload,
        extras: EventExtras,
    ) -> Result<(), ConnectorError> {
        let context = EventContext {
            event_type,
            connector: self,
            provider: self.provider,
            service: service.map(str::to_string),
            payload,
            extras,
        };
        self.events.dispatch(&context)
    }

    fn prefixed(&self, key: String) -> String {
        if key.starts_with(&self.label_prefix) {
            key
        } else {
            format!("{}{}", self.label_prefix, key)
        }
    }

    /// Record a seed under its (prefixed) label and notify `SEED_FOUND`
    /// observers. Observers are notified even when the seed was already known.
    pub fn add_seed(&self, mut seed: Seed, service: Option<&str>, extras: EventExtras) -> Result<(), ConnectorError> {
        seed.label = self.prefixed(seed.label);
        debug!(payload = %seed.to_payload(), "Found seed");
        self.accumulator.insert_seed(seed.clone());
        self.dispatch_event(EventType::SeedFound, service, EventPayload::Seed(seed), extras)
    }

    pub fn add_cloud_asset(
        &self,
        mut asset: CloudAsset,
        service: Option<&str>,
        extras: EventExtras,
    ) -> Result<(), ConnectorError> {
        asset.uid = self.prefixed(asset.uid);
        debug!(payload = %asset.to_payload(), "Found cloud asset");
        self.accumulator.insert_cloud_asset(asset.clone());
        self.dispatch_event(EventType::CloudAssetFound, service, EventPayload::CloudAsset(asset), extras)
    }

    pub async fn get_seeds(&self, provider_settings: &ProviderSettings) -> Result<(), ConnectorError> {
        self.get_seeds_with(provider_settings, &EventExtras::new()).await
    }

    pub async fn get_seeds_with(
        &self,
        provider_settings: &ProviderSettings,
        extras: &EventExtras,
    ) -> Result<(), ConnectorError> {
        self.run_scanners(&self.seed_scanners, provider_settings, extras).await
    }

    pub async fn get_cloud_assets(&self, provider_settings: &ProviderSettings) -> Result<(), ConnectorError> {
        self.get_cloud_assets_with(provider_settings, &EventExtras::new()).await
    }

    pub async fn get_cloud_assets_with(
        &self,
        provider_settings: &ProviderSettings,
        extras: &EventExtras,
    ) -> Result<(), ConnectorError> {
        self.run_scanners(&self.cloud_asset_scanners, provider_settings, extras).await
    }

    /// Run every non-ignored scanner with at most `max_concurrent_scans` in
    /// flight. The first failure is returned and the remaining scanners are
    /// dropped; whatever was already reported stays in the accumulator.
    async fn run_scanners(
        &self,
        scanners: &ScannerSet,
        provider_settings: &ProviderSettings,
        extras: &EventExtras,
    ) -> Result<(), ConnectorError> {
        let limit = self.settings.max_concurrent_scans.max(1);
        let scheduled: Vec<_> = scanners
            .iter()
            .filter(|(resource_type, _)| {
                let ignored = provider_settings.is_ignored(resource_type);
                if ignored {
                    info!(provider = %self.provider, resource_type, "Skipping ignored resource type");
                }
                !ignored
            })
            .collect();

        stream::iter(scheduled)
            .map(|(resource_type, scanner)| async move {
                let ctx = ScanContext::new(self, provider_settings, resource_type, extras);
                let started = Instant::now();
                let result = scanner.scan(&ctx).await;
                debug!(
                    provider = %self.provider,
                    resource_type,
                    duration_ms = started.elapsed().as_millis() as u64,
                    ok = result.is_ok(),
                    "Scanner finished"
                );
                result.map_err(|e| scanner_error(resource_type, e))
            })
            .buffer_unordered(limit)
            .try_collect::<Vec<()>>()
            .await?;
        Ok(())
    }

    pub async fn submit_seeds(&self) -> Result<SubmissionOutcome, ConnectorError> {
        let outcome = self.gateway.submit_seeds(self.accumulator.seed_partitions()).await;
        self.dispatch_event(
            EventType::SeedsSubmitted,
            None,
            EventPayload::Count(outcome.submitted),
            EventExtras::new(),
        )?;
        Ok(outcome)
    }

    pub async fn submit_cloud_assets(&self) -> Result<SubmissionOutcome, ConnectorError> {
        let outcome = self.gateway.submit_cloud_assets(self.accumulator.cloud_asset_partitions()).await;
        self.dispatch_event(
            EventType::CloudAssetsSubmitted,
            None,
            EventPayload::Count(outcome.submitted),
            EventExtras::new(),
        )?;
        Ok(outcome)
    }

    /// Submit everything accumulated, or nothing in dry-run mode. The
    /// accumulator is empty afterwards either way.
    pub async fn submit(&self) -> Result<SubmissionReport, ConnectorError> {
        let result = self.submit_partitions().await;
        self.clear();
        result
    }

    async fn submit_partitions(&self) -> Result<SubmissionReport, ConnectorError> {
        if self.settings.dry_run {
            info!("Dry run enabled. Skipping submission.");
            return Ok(SubmissionReport { skipped: true, ..Default::default() });
        }
        info!("Submitting seeds and assets...");
        let seeds = self.submit_seeds().await?;
        let cloud_assets = self.submit_cloud_assets().await?;
        Ok(SubmissionReport { seeds, cloud_assets, skipped: false })
    }

    /// Remove every seed stored under `label` from the inventory. The label is
    /// used exactly as given. Dry-run mode makes no request.
    pub async fn delete_seeds_by_label(&self, label: &str) -> Result<(), ConnectorError> {
        if self.settings.dry_run {
            info!(label, "Dry run enabled. Skipping seed deletion.");
            return Ok(());
        }
        self.gateway.delete_seeds_by_label(label).await?;
        info!(label, "Deleted seeds");
        self.dispatch_event(
            EventType::SeedsDeleted,
            None,
            EventPayload::Label(label.to_string()),
            EventExtras::new(),
        )
    }

    pub fn clear(&self) {
        self.accumulator.clear();
    }

    /// One full scan cycle for `provider_settings`. On error the accumulator
    /// is emptied before returning, so the next cycle starts clean.
    pub async fn scan(&self, provider_settings: &ProviderSettings) -> Result<ScanSummary, ConnectorError> {
        self.scan_with(provider_settings, EventExtras::new()).await
    }

    /// Like [`scan`](Self::scan), with per-cycle values every scanner can
    /// read through [`ScanContext::extras`].
    pub async fn scan_with(
        &self,
        provider_settings: &ProviderSettings,
        extras: EventExtras,
    ) -> Result<ScanSummary, ConnectorError> {
        if provider_settings.provider != self.provider {
            return Err(ConnectorError::Config(format!(
                "{} connector cannot scan a {} account",
                self.provider, provider_settings.provider
            )));
        }

        let started = Instant::now();
        let result = self.run_cycle(provider_settings, &extras).await;
        if result.is_err() {
            self.clear();
        }
        self.set_state(ScanState::Idle).await;

        let (seeds_found, cloud_assets_found, submission) = result?;
        let summary = ScanSummary {
            provider: self.provider,
            account: provider_settings.account.clone(),
            seeds_found,
            cloud_assets_found,
            submission,
            duration_ms: started.elapsed().as_millis() as u64,
        };
        info!(
            provider = %summary.provider,
            account = %summary.account,
            seeds = summary.seeds_found,
            cloud_assets = summary.cloud_assets_found,
            duration_ms = summary.duration_ms,
            "Scan finished"
        );
        Ok(summary)
    }

    async fn run_cycle(
        &self,
        provider_settings: &ProviderSettings,
        extras: &EventExtras,
    ) -> Result<(usize, usize, SubmissionReport), ConnectorError> {
        info!(provider = %self.provider, account = %provider_settings.account, "Gathering seeds and assets...");
        self.set_state(ScanState::ScanningSeeds).await;
        self.dispatch_event(EventType::ScanStarted, None, EventPayload::None, EventExtras::new())?;
        self.get_seeds_with(provider_settings, extras).await?;

        self.set_state(ScanState::ScanningAssets).await;
        self.get_cloud_assets_with(provider_settings, extras).await?;

        let seeds_found = self.accumulator.seed_count();
        let cloud_assets_found = self.accumulator.cloud_asset_count();

        self.set_state(ScanState::Submitting).await;
        let submission = self.submit().await?;

        self.dispatch_event(EventType::ScanFinished, None, EventPayload::None, EventExtras::new())?;
        self.clear();
        Ok((seeds_found, cloud_assets_found, submission))
    }
}

/// Observer failures raised from inside a scanner keep their identity; any
/// other failure is attributed to the scanner's resource type.
fn scanner_error(resource_type: &str, error: anyhow::Error) -> ConnectorError {
    match error.downcast::<ConnectorError>() {
        Ok(e @ ConnectorError::Observer { .. }) => e,
        Ok(e) => ConnectorError::scanner(resource_type, e.into()),
        Err(e) => ConnectorError::scanner(resource_type, e),
    }
}

impl std::fmt::Debug for CloudConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudConnector")
            .field("provider", &self.provider)
            .field("dry_run", &self.settings.dry_run)
            .field("max_concurrent_scans", &self.settings.max_concurrent_scans)
            .field("seed_scanners", &self.seed_scanners)
            .field("cloud_asset_scanners", &self.cloud_asset_scanners)
            .field("seeds", &self.accumulator.seed_count())
            .field("cloud_assets", &self.accumulator.cloud_asset_count())
            .finish()
    }
}
