use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use crate::errors::ConnectorError;
use super::provider::ProviderKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CloudAssetType {
    ObjectStorage,
}

impl CloudAssetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ObjectStorage => "OBJECT_STORAGE",
        }
    }
}

impl std::fmt::Display for CloudAssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A provider-native resource reported to the inventory with its metadata.
///
/// Identity is `(uid, asset_type, value)`. `scan_data` is carried along but
/// does not take part in equality, so the first report of a resource wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudAsset {
    #[serde(rename = "type")]
    pub asset_type: CloudAssetType,
    pub value: String,
    pub csp: ProviderKind,
    pub uid: String,
    #[serde(default)]
    pub scan_data: BTreeMap<String, Value>,
}

impl CloudAsset {
    pub fn new(
        asset_type: CloudAssetType,
        value: impl Into<String>,
        uid: impl Into<String>,
        csp: ProviderKind,
    ) -> Self {
        Self {
            asset_type,
            value: value.into(),
            csp,
            uid: uid.into(),
            scan_data: BTreeMap::new(),
        }
    }

    pub fn object_storage(value: impl Into<String>, uid: impl Into<String>, csp: ProviderKind) -> Self {
        Self::new(CloudAssetType::ObjectStorage, value, uid, csp)
    }

    pub fn with_scan_data(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.scan_data.insert(key.to_string(), value.into());
        self
    }

    pub fn to_payload(&self) -> Value {
        json!({
            "type": self.asset_type.as_str(),
            "value": self.value,
            "csp": self.csp.label(),
            "uid": self.uid,
            "scanData": self.scan_data,
        })
    }

    pub fn from_payload(payload: Value) -> Result<Self, ConnectorError> {
        Ok(serde_json::from_value(payload)?)
    }
}

impl PartialEq for CloudAsset {
    fn eq(&self, other: &Self) -> bool {
        self.uid == other.uid
            && self.asset_type == other.asset_type
            && self.value == other.value
    }
}

impl Eq for CloudAsset {}

impl Hash for CloudAsset {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uid.hash(state);
        self.asset_type.hash(state);
        self.value.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn container(url: &str) -> CloudAsset {
        CloudAsset::object_storage(url, "AZURE: sub/eastus", ProviderKind::Azure)
    }

    #[test]
    fn test_scan_data_ignored_for_identity() {
        let a = container("https://acct.blob.core.windows.net/logs")
            .with_scan_data("publicAccess", "container");
        let b = container("https://acct.blob.core.windows.net/logs");
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        set.insert(b);
        assert_eq!(set.len(), 1);
        assert!(set.iter().next().unwrap().scan_data.contains_key("publicAccess"));
    }

    #[test]
    fn test_payload_uses_camel_case_and_csp_label() {
        let asset = container("https://acct.blob.core.windows.net/logs")
            .with_scan_data("accountNumber", "sub");
        let payload = asset.to_payload();
        assert_eq!(payload["type"], "OBJECT_STORAGE");
        assert_eq!(payload["csp"], "AZURE");
        assert_eq!(payload["scanData"]["accountNumber"], "sub");
    }

    #[test]
    fn test_payload_reconstructs_asset() {
        let asset = container("https://acct.blob.core.windows.net/public")
            .with_scan_data("location", "eastus");
        let rebuilt = CloudAsset::from_payload(asset.to_payload()).unwrap();
        assert_eq!(rebuilt, asset);
        assert_eq!(rebuilt.scan_data, asset.scan_data);
        assert_eq!(rebuilt.csp, ProviderKind::Azure);
    }
}
