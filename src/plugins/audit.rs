use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use chrono::Utc;
use serde_json::json;
use crate::connector::{EventContext, EventRegistry, EventType, Plugin};
use crate::errors::ConnectorError;

type SharedLog = Arc<Mutex<Option<File>>>;

/// Appends one JSON line per lifecycle event to `events.jsonl`. The file is
/// opened once by [`initialize`](Self::initialize) and shared by every
/// observer the plugin registers.
pub struct AuditLogPlugin {
    path: PathBuf,
    file: SharedLog,
}

impl AuditLogPlugin {
    pub fn new(base_dir: &Path) -> Self {
        Self { path: base_dir.join("events.jsonl"), file: Arc::new(Mutex::new(None)) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the directory and open an empty log for writing.
    pub async fn initialize(&self) -> Result<(), ConnectorError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let file = tokio::fs::File::create(&self.path).await?.into_std().await;
        let mut slot = self
            .file
            .lock()
            .map_err(|_| ConnectorError::Internal("audit log lock poisoned".into()))?;
        *slot = Some(file);
        Ok(())
    }
}

fn record(log: &SharedLog, ctx: &EventContext<'_>) -> anyhow::Result<()> {
    let line = json!({
        "timestamp": Utc::now().to_rfc3339(),
        "event": ctx.event_type,
        "provider": ctx.provider,
        "service": ctx.service,
        "payload": ctx.payload,
        "extras": ctx.extras,
    });
    let mut slot = log.lock().map_err(|_| anyhow::anyhow!("audit log lock poisoned"))?;
    let file = slot
        .as_mut()
        .ok_or_else(|| anyhow::anyhow!("audit log used before initialize"))?;
    writeln!(file, "{}", line)?;
    Ok(())
}

impl Plugin for AuditLogPlugin {
    fn name(&self) -> &str {
        "audit-log"
    }

    fn register(&self, registry: &mut EventRegistry) {
        let log = self.file.clone();
        registry.register_many(&EventType::ALL, move |ctx| record(&log, ctx));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use serde_json::Value;
    use crate::config::Settings;
    use crate::connector::{CloudConnector, ConnectorConfig, EventExtras};
    use crate::inventory::test_support::RecordingInventory;
    use crate::models::Seed;

    #[tokio::test]
    async fn test_writes_one_line_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let plugin = AuditLogPlugin::new(&dir.path().join("audit"));
        plugin.initialize().await.unwrap();

        let mut registry = EventRegistry::new();
        registry.register_plugin(&plugin);
        let connector = CloudConnector::new(
            ConnectorConfig::new("gcp", Arc::new(Settings::new("key"))),
            Arc::new(RecordingInventory::default()),
        )
        .unwrap()
        .with_events(Arc::new(registry));

        let mut extras = EventExtras::new();
        extras.insert("zone".into(), "us-central1-a".into());
        connector
            .add_seed(Seed::ip_address("34.1.2.3", "project-1/us-central1"), Some("compute_addresses"), extras)
            .unwrap();
        connector.submit().await.unwrap();

        let content = std::fs::read_to_string(plugin.path()).unwrap();
        let lines: Vec<Value> = content.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["event"], "SEED_FOUND");
        assert_eq!(lines[0]["provider"], "GCP");
        assert_eq!(lines[0]["service"], "compute_addresses");
        assert_eq!(lines[0]["payload"]["data"]["label"], "GCP: project-1/us-central1");
        assert_eq!(lines[0]["extras"]["zone"], "us-central1-a");
        assert_eq!(lines[1]["event"], "SEEDS_SUBMITTED");
        assert_eq!(lines[1]["payload"]["data"], 1);
        assert_eq!(lines[2]["event"], "CLOUD_ASSETS_SUBMITTED");
    }

    #[tokio::test]
    async fn test_event_before_initialize_is_an_observer_error() {
        let dir = tempfile::tempdir().unwrap();
        let plugin = AuditLogPlugin::new(dir.path());

        let mut registry = EventRegistry::new();
        registry.register_plugin(&plugin);
        let connector = CloudConnector::new(
            ConnectorConfig::new("aws", Arc::new(Settings::new("key"))),
            Arc::new(RecordingInventory::default()),
        )
        .unwrap()
        .with_events(Arc::new(registry));

        let err = connector
            .add_seed(Seed::ip_address("3.3.3.3", "123456789012/us-east-1"), None, EventExtras::new())
            .unwrap_err();
        assert!(matches!(err, ConnectorError::Observer { .. }));
        assert!(!plugin.path().exists());

        plugin.initialize().await.unwrap();
        for value in ["3.3.3.3", "4.4.4.4"] {
            connector
                .add_seed(Seed::ip_address(value, "123456789012/us-east-1"), None, EventExtras::new())
                .unwrap();
        }
        assert_eq!(std::fs::read_to_string(plugin.path()).unwrap().lines().count(), 2);
    }
}
