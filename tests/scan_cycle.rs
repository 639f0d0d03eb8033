use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use cloud_connector::config::parse_settings;
use cloud_connector::connector::{AccountStatus, EventType};
use cloud_connector::models::CloudAssetType;
use cloud_connector::plugins::AuditLogPlugin;
use cloud_connector::{
    CloudAsset, ConnectorError, EventRegistry, InventoryApi, Platform, ProviderKind, ProviderSettings,
    ScanContext, ScanRunner, Scanner, ScannerSet, Seed,
};
use serde_json::Value;
use tempfile::TempDir;

#[derive(Default)]
struct FakeInventory {
    seeds: Mutex<Vec<(String, Vec<Value>, bool)>>,
    cloud_assets: Mutex<Vec<(String, Vec<Value>)>>,
}

#[async_trait]
impl InventoryApi for FakeInventory {
    async fn replace_seeds_by_label(&self, label: &str, seeds: &[Value], force: bool) -> Result<(), ConnectorError> {
        self.seeds.lock().unwrap().push((label.to_string(), seeds.to_vec(), force));
        Ok(())
    }

    async fn add_cloud_assets(&self, uid: &str, assets: &[Value]) -> Result<(), ConnectorError> {
        self.cloud_assets.lock().unwrap().push((uid.to_string(), assets.to_vec()));
        Ok(())
    }

    fn endpoint(&self) -> &str {
        "fake"
    }
}

/// Reports one public IP per configured region.
struct PublicIps;

#[async_trait]
impl Scanner for PublicIps {
    async fn scan(&self, ctx: &ScanContext<'_>) -> anyhow::Result<()> {
        for (i, region) in ctx.provider_settings().regions.iter().enumerate() {
            ctx.add_seed(Seed::ip_address(format!("20.0.0.{}", i + 1), ctx.label_for(region)))?;
        }
        Ok(())
    }
}

struct Buckets;

#[async_trait]
impl Scanner for Buckets {
    async fn scan(&self, ctx: &ScanContext<'_>) -> anyhow::Result<()> {
        let uid = ctx.label_for("eastus");
        let asset = CloudAsset::object_storage("https://acct.blob.core.windows.net/backups", uid, ProviderKind::Azure)
            .with_scan_data("accountNumber", ctx.provider_settings().account.as_str())
            .with_scan_data("publicAccess", "container");
        ctx.add_cloud_asset(asset)?;
        Ok(())
    }
}

struct Azure;

impl Platform for Azure {
    fn provider(&self) -> ProviderKind {
        ProviderKind::Azure
    }

    fn seed_scanners(&self, _provider_settings: &ProviderSettings) -> ScannerSet {
        ScannerSet::new().with("public_ip_addresses", PublicIps)
    }

    fn cloud_asset_scanners(&self, _provider_settings: &ProviderSettings) -> ScannerSet {
        ScannerSet::new().with("storage_containers", Buckets)
    }
}

async fn write_settings(dir: &TempDir, body: &str) -> std::path::PathBuf {
    let path = dir.path().join("providers.yml");
    tokio::fs::write(&path, body).await.unwrap();
    path
}

const SETTINGS: &str = r#"
inventory:
  api_key: test-api-key
dry_run: false
max_concurrent_scans: 2
providers:
  - provider: azure
    account: sub-1
    regions: [eastus, westeurope]
  - provider: azure
    account: sub-2
    regions: [eastus]
    ignore: [storage_containers]
  - provider: gcp
    account: project-1
"#;

#[tokio::test]
async fn test_full_run_from_settings_file() {
    let dir = TempDir::new().unwrap();
    let path = write_settings(&dir, SETTINGS).await;
    let settings = Arc::new(parse_settings(&path).await.unwrap());
    let inventory = Arc::new(FakeInventory::default());

    let report = ScanRunner::new(settings, inventory.clone())
        .with_platform(Azure)
        .scan_all()
        .await;

    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.skipped(), 1);
    assert_eq!(report.failed(), 0);

    let seeds = inventory.seeds.lock().unwrap();
    let labels: Vec<&str> = seeds.iter().map(|(label, _, _)| label.as_str()).collect();
    assert_eq!(labels, vec!["AZURE: sub-1/eastus", "AZURE: sub-1/westeurope", "AZURE: sub-2/eastus"]);
    assert!(seeds.iter().all(|(_, _, force)| !force));
    assert_eq!(seeds[0].1[0]["type"], "IP_ADDRESS");

    // sub-2 ignores storage containers, so only sub-1 reports a bucket.
    let assets = inventory.cloud_assets.lock().unwrap();
    assert_eq!(assets.len(), 1);
    assert_eq!(assets[0].0, "AZURE: sub-1/eastus");
    let asset = CloudAsset::from_payload(assets[0].1[0].clone()).unwrap();
    assert_eq!(asset.asset_type, CloudAssetType::ObjectStorage);
    assert_eq!(asset.csp, ProviderKind::Azure);
    assert_eq!(asset.scan_data["accountNumber"], "sub-1");

    match &report.accounts[0].status {
        AccountStatus::Completed(summary) => {
            assert_eq!(summary.seeds_found, 2);
            assert_eq!(summary.cloud_assets_found, 1);
        }
        other => panic!("unexpected status: {other:?}"),
    }
}

#[tokio::test]
async fn test_dry_run_reports_but_never_submits() {
    let dir = TempDir::new().unwrap();
    let path = write_settings(&dir, &SETTINGS.replace("dry_run: false", "dry_run: true")).await;
    let settings = Arc::new(parse_settings(&path).await.unwrap());
    let inventory = Arc::new(FakeInventory::default());

    let found = Arc::new(Mutex::new(0usize));
    let counter = found.clone();
    let mut events = EventRegistry::new();
    events.register(EventType::SeedFound, move |_| {
        *counter.lock().unwrap() += 1;
        Ok(())
    });

    let report = ScanRunner::new(settings, inventory.clone())
        .with_events(events)
        .with_platform(Azure)
        .scan_all()
        .await;

    assert_eq!(report.succeeded(), 2);
    assert_eq!(*found.lock().unwrap(), 3);
    assert!(inventory.seeds.lock().unwrap().is_empty());
    assert!(inventory.cloud_assets.lock().unwrap().is_empty());
    if let AccountStatus::Completed(summary) = &report.accounts[0].status {
        assert!(summary.submission.skipped);
    }
}

#[tokio::test]
async fn test_audit_log_records_the_run() {
    let dir = TempDir::new().unwrap();
    let path = write_settings(&dir, SETTINGS).await;
    let settings = Arc::new(parse_settings(&path).await.unwrap());

    let audit = AuditLogPlugin::new(&dir.path().join("audit"));
    audit.initialize().await.unwrap();
    let mut events = EventRegistry::new();
    events.register_plugin(&audit);

    ScanRunner::new(settings, Arc::new(FakeInventory::default()))
        .with_events(events)
        .with_platform(Azure)
        .scan_all()
        .await;

    let content = tokio::fs::read_to_string(audit.path()).await.unwrap();
    let events: Vec<String> = content
        .lines()
        .map(|l| serde_json::from_str::<Value>(l).unwrap()["event"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(events.first().map(String::as_str), Some("SCAN_STARTED"));
    assert_eq!(events.last().map(String::as_str), Some("SCAN_FINISHED"));
    assert_eq!(events.iter().filter(|e| *e == "SCAN_STARTED").count(), 2);
    assert_eq!(events.iter().filter(|e| *e == "CLOUD_ASSET_FOUND").count(), 1);
}

#[tokio::test]
async fn test_invalid_settings_are_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_settings(&dir, &SETTINGS.replace("max_concurrent_scans: 2", "max_concurrent_scans: 0")).await;
    let err = parse_settings(&path).await.unwrap_err();
    assert!(matches!(err, ConnectorError::Config(_)));

    let missing = dir.path().join("missing.yml");
    assert!(matches!(parse_settings(&missing).await, Err(ConnectorError::Config(_))));
}
