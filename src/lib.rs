//! Cloud connector core: runs provider scanners, collects the seeds and cloud
//! assets they report, and submits them to the asset inventory.

pub mod config;
pub mod connector;
pub mod errors;
pub mod inventory;
pub mod models;
pub mod plugins;

pub use config::{ProviderSettings, Settings};
pub use connector::{
    CloudConnector, ConnectorConfig, EventRegistry, EventType, Platform, ScanContext, ScanRunner,
    Scanner, ScannerSet,
};
pub use errors::ConnectorError;
pub use inventory::{AsmClient, InventoryApi};
pub use models::{CloudAsset, ProviderKind, Seed};
