use std::collections::{BTreeMap, HashSet};
use dashmap::DashMap;
use crate::models::{CloudAsset, Seed};

/// Label-partitioned store of everything found during one scan cycle.
///
/// Seeds are keyed by label, cloud assets by uid. Reading a partition that
/// was never written yields an empty set. Concurrent scanners insert through
/// a shared reference; each insert is a set union on one partition.
#[derive(Debug, Default)]
pub struct Accumulator {
    seeds: DashMap<String, HashSet<Seed>>,
    cloud_assets: DashMap<String, HashSet<CloudAsset>>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when an equal seed was already present.
    pub(crate) fn insert_seed(&self, seed: Seed) -> bool {
        self.seeds.entry(seed.label.clone()).or_default().insert(seed)
    }

    pub(crate) fn insert_cloud_asset(&self, asset: CloudAsset) -> bool {
        self.cloud_assets.entry(asset.uid.clone()).or_default().insert(asset)
    }

    pub fn seeds_for(&self, label: &str) -> HashSet<Seed> {
        self.seeds.get(label).map(|s| s.value().clone()).unwrap_or_default()
    }

    pub fn cloud_assets_for(&self, uid: &str) -> HashSet<CloudAsset> {
        self.cloud_assets.get(uid).map(|s| s.value().clone()).unwrap_or_default()
    }

    pub fn seed_labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self.seeds.iter().map(|e| e.key().clone()).collect();
        labels.sort();
        labels
    }

    pub fn cloud_asset_uids(&self) -> Vec<String> {
        let mut uids: Vec<String> = self.cloud_assets.iter().map(|e| e.key().clone()).collect();
        uids.sort();
        uids
    }

    pub fn seed_count(&self) -> usize {
        self.seeds.iter().map(|e| e.value().len()).sum()
    }

    pub fn cloud_asset_count(&self) -> usize {
        self.cloud_assets.iter().map(|e| e.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty() && self.cloud_assets.is_empty()
    }

    /// Copy of the seed partitions, ordered by label and by value within a label.
    pub fn seed_partitions(&self) -> BTreeMap<String, Vec<Seed>> {
        self.seeds
            .iter()
            .map(|e| {
                let mut seeds: Vec<Seed> = e.value().iter().cloned().collect();
                seeds.sort_by(|a, b| a.value.cmp(&b.value).then(a.seed_type.as_str().cmp(b.seed_type.as_str())));
                (e.key().clone(), seeds)
            })
            .collect()
    }

    pub fn cloud_asset_partitions(&self) -> BTreeMap<String, Vec<CloudAsset>> {
        self.cloud_assets
            .iter()
            .map(|e| {
                let mut assets: Vec<CloudAsset> = e.value().iter().cloned().collect();
                assets.sort_by(|a, b| a.value.cmp(&b.value));
                (e.key().clone(), assets)
            })
            .collect()
    }

    pub fn clear(&self) {
        self.seeds.clear();
        self.cloud_assets.clear();
    }
}
