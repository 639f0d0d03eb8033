use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use crate::errors::ConnectorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeedType {
    IpAddress,
    DomainName,
    Cidr,
    Asn,
}

impl SeedType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IpAddress => "IP_ADDRESS",
            Self::DomainName => "DOMAIN_NAME",
            Self::Cidr => "CIDR",
            Self::Asn => "ASN",
        }
    }
}

impl std::fmt::Display for SeedType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A network identifier (IP, domain, CIDR, ASN) submitted for external scanning.
///
/// Two seeds are the same seed when value, label and type all match, so the
/// same endpoint reported by two scanners collapses into one entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Seed {
    #[serde(rename = "type")]
    pub seed_type: SeedType,
    pub value: String,
    pub label: String,
}

impl Seed {
    pub fn new(seed_type: SeedType, value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            seed_type,
            value: value.into(),
            label: label.into(),
        }
    }

    pub fn ip_address(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(SeedType::IpAddress, value, label)
    }

    /// Domain seed. Providers return fully qualified names with a trailing
    /// dot, which the inventory does not accept.
    pub fn domain_name(value: impl Into<String>, label: impl Into<String>) -> Self {
        let value = value.into();
        let value = value.strip_suffix('.').map(str::to_string).unwrap_or(value);
        Self::new(SeedType::DomainName, value, label)
    }

    pub fn cidr(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(SeedType::Cidr, value, label)
    }

    pub fn asn(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(SeedType::Asn, value, label)
    }

    pub fn to_payload(&self) -> Value {
        json!({
            "type": self.seed_type.as_str(),
            "value": self.value,
            "label": self.label,
        })
    }

    pub fn from_payload(payload: Value) -> Result<Self, ConnectorError> {
        Ok(serde_json::from_value(payload)?)
    }
}
