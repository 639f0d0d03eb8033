use serde::{Deserialize, Serialize};
use crate::inventory::SubmissionOutcome;
use crate::models::ProviderKind;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ScanState {
    #[default]
    Idle,
    ScanningSeeds,
    ScanningAssets,
    Submitting,
}

impl std::fmt::Display for ScanState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::ScanningSeeds => write!(f, "scanning-seeds"),
            Self::ScanningAssets => write!(f, "scanning-assets"),
            Self::Submitting => write!(f, "submitting"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmissionReport {
    pub seeds: SubmissionOutcome,
    pub cloud_assets: SubmissionOutcome,
    /// True when dry-run suppressed every request.
    pub skipped: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSummary {
    pub provider: ProviderKind,
    pub account: String,
    pub seeds_found: usize,
    pub cloud_assets_found: usize,
    pub submission: SubmissionReport,
    pub duration_ms: u64,
}

impl ScanSummary {
    pub fn failed_partitions(&self) -> impl Iterator<Item = &String> {
        self.submission.seeds.failed.iter().chain(self.submission.cloud_assets.failed.iter())
    }
}
