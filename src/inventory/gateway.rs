use std::collections::BTreeMap;
use std::sync::Arc;
use serde::{Deserialize, Serialize};
use crate::errors::ConnectorError;
use crate::models::{CloudAsset, Seed};
use super::api::InventoryApi;
use tracing::{error, info};

/// Result of submitting one kind of entity, partition by partition.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmissionOutcome {
    /// Entities in partitions the inventory accepted.
    pub submitted: usize,
    /// Labels (or connector uids) whose request failed.
    pub failed: Vec<String>,
}

impl SubmissionOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Sends accumulated partitions to the inventory, one request per partition.
/// A failed partition is logged and recorded; the rest still go out.
#[derive(Clone)]
pub struct SubmissionGateway {
    api: Arc<dyn InventoryApi>,
}

impl SubmissionGateway {
    pub fn new(api: Arc<dyn InventoryApi>) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &Arc<dyn InventoryApi> {
        &self.api
    }

    pub async fn submit_seeds(&self, partitions: BTreeMap<String, Vec<Seed>>) -> SubmissionOutcome {
        let mut outcome = SubmissionOutcome::default();
        for (label, seeds) in partitions {
            let payload: Vec<_> = seeds.iter().map(Seed::to_payload).collect();
            match self.api.replace_seeds_by_label(&label, &payload, false).await {
                Ok(()) => outcome.submitted += seeds.len(),
                Err(e) => {
                    error!(label = %label, error = %e, "Failed to submit seeds");
                    outcome.failed.push(label);
                }
            }
        }
        info!("Submitted {} seeds.", outcome.submitted);
        outcome
    }

    pub async fn submit_cloud_assets(&self, partitions: BTreeMap<String, Vec<CloudAsset>>) -> SubmissionOutcome {
        let mut outcome = SubmissionOutcome::default();
        for (uid, assets) in partitions {
            let payload: Vec<_> = assets.iter().map(CloudAsset::to_payload).collect();
            match self.api.add_cloud_assets(&uid, &payload).await {
                Ok(()) => outcome.submitted += assets.len(),
                Err(e) => {
                    error!(uid = %uid, error = %e, "Failed to submit cloud assets");
                    outcome.failed.push(uid);
                }
            }
        }
        info!("Submitted {} cloud assets.", outcome.submitted);
        outcome
    }

    /// Remove every seed under `label`, including ones shared with other labels.
    pub async fn delete_seeds_by_label(&self, label: &str) -> Result<(), ConnectorError> {
        self.api.replace_seeds_by_label(label, &[], true).await
    }
}

impl std::fmt::Debug for SubmissionGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionGateway")
            .field("endpoint", &self.api.endpoint())
            .finish()
    }
}
