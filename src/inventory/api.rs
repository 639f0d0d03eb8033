use async_trait::async_trait;
use serde_json::Value;
use crate::errors::ConnectorError;

/// Remote asset inventory the connectors report into.
#[async_trait]
pub trait InventoryApi: Send + Sync {
    /// Replace every seed stored under `label` with `seeds`. With `force`,
    /// seeds that other labels also reference are removed as well.
    async fn replace_seeds_by_label(
        &self,
        label: &str,
        seeds: &[Value],
        force: bool,
    ) -> Result<(), ConnectorError>;

    /// Add (or refresh) cloud assets under a connector uid.
    async fn add_cloud_assets(&self, uid: &str, assets: &[Value]) -> Result<(), ConnectorError>;

    /// Base endpoint, for logging
    fn endpoint(&self) -> &str;
}
