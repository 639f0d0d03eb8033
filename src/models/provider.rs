use serde::{Deserialize, Serialize};
use std::str::FromStr;
use crate::errors::ConnectorError;

/// Cloud service provider a connector scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProviderKind {
    #[serde(rename = "AWS", alias = "aws", alias = "Aws")]
    Aws,
    #[serde(rename = "AZURE", alias = "azure", alias = "Azure")]
    Azure,
    #[serde(rename = "GCP", alias = "gcp", alias = "Gcp")]
    Gcp,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 3] = [Self::Aws, Self::Azure, Self::Gcp];

    /// Upper-case label used to namespace seed labels and cloud asset uids.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Aws => "AWS",
            Self::Azure => "AZURE",
            Self::Gcp => "GCP",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aws => "aws",
            Self::Azure => "azure",
            Self::Gcp => "gcp",
        }
    }

    /// Prefix every label and uid produced by this provider's connector carries.
    pub fn label_prefix(&self) -> String {
        format!("{}: ", self.label())
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ConnectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ConnectorError::Config("The provider must be set.".into()));
        }
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ConnectorError::Config(format!("Unknown provider: {}", trimmed)))
    }
}
