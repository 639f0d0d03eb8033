//! Lifecycle events and the observer registry connectors dispatch them to.
//!
//! The registry is assembled before any scan runs and then shared behind an
//! `Arc`, which leaves no way to add or remove observers while a dispatch is
//! in progress. Observers run synchronously, in registration order, and an
//! observer error is returned to whoever dispatched the event.

use std::collections::HashMap;
use std::sync::Arc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use crate::errors::ConnectorError;
use crate::models::{CloudAsset, ProviderKind, Seed};
use super::orchestrator::CloudConnector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    ScanStarted,
    ScanFinished,
    SeedFound,
    CloudAssetFound,
    SeedsSubmitted,
    CloudAssetsSubmitted,
    SeedsDeleted,
}

impl EventType {
    pub const ALL: [EventType; 7] = [
        Self::ScanStarted,
        Self::ScanFinished,
        Self::SeedFound,
        Self::CloudAssetFound,
        Self::SeedsSubmitted,
        Self::CloudAssetsSubmitted,
        Self::SeedsDeleted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ScanStarted => "SCAN_STARTED",
            Self::ScanFinished => "SCAN_FINISHED",
            Self::SeedFound => "SEED_FOUND",
            Self::CloudAssetFound => "CLOUD_ASSET_FOUND",
            Self::SeedsSubmitted => "SEEDS_SUBMITTED",
            Self::CloudAssetsSubmitted => "CLOUD_ASSETS_SUBMITTED",
            Self::SeedsDeleted => "SEEDS_DELETED",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event-specific data carried alongside the context.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum EventPayload {
    None,
    Seed(Seed),
    CloudAsset(CloudAsset),
    Count(usize),
    Label(String),
}

/// Free-form keyword data forwarded from the call site to observers.
pub type EventExtras = Map<String, Value>;

/// One lifecycle transition, built fresh for every dispatch.
#[derive(Debug)]
pub struct EventContext<'a> {
    pub event_type: EventType,
    pub connector: &'a CloudConnector,
    pub provider: ProviderKind,
    /// Resource type being scanned when the event fired, if any.
    pub service: Option<String>,
    pub payload: EventPayload,
    pub extras: EventExtras,
}

impl EventContext<'_> {
    pub fn seed(&self) -> Option<&Seed> {
        match &self.payload {
            EventPayload::Seed(seed) => Some(seed),
            _ => None,
        }
    }

    pub fn cloud_asset(&self) -> Option<&CloudAsset> {
        match &self.payload {
            EventPayload::CloudAsset(asset) => Some(asset),
            _ => None,
        }
    }

    pub fn count(&self) -> Option<usize> {
        match self.payload {
            EventPayload::Count(count) => Some(count),
            _ => None,
        }
    }
}

pub type Observer = Arc<dyn Fn(&EventContext<'_>) -> anyhow::Result<()> + Send + Sync>;

/// A bundle of observers registered together, e.g. an audit log.
pub trait Plugin: Send + Sync {
    fn name(&self) -> &str;

    fn register(&self, registry: &mut EventRegistry);
}

#[derive(Clone, Default)]
pub struct EventRegistry {
    observers: HashMap<EventType, Vec<Observer>>,
    plugins: Vec<String>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, event_type: EventType, observer: F) -> &mut Self
    where
        F: Fn(&EventContext<'_>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.observers.entry(event_type).or_default().push(Arc::new(observer));
        self
    }

    /// Register one observer for several event types.
    pub fn register_many<F>(&mut self, event_types: &[EventType], observer: F) -> &mut Self
    where
        F: Fn(&EventContext<'_>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let observer: Observer = Arc::new(observer);
        for event_type in event_types {
            self.observers.entry(*event_type).or_default().push(observer.clone());
        }
        self
    }

    pub fn register_plugin(&mut self, plugin: &dyn Plugin) -> &mut Self {
        plugin.register(self);
        self.plugins.push(plugin.name().to_string());
        self
    }

    pub fn plugins(&self) -> &[String] {
        &self.plugins
    }

    pub fn observer_count(&self, event_type: EventType) -> usize {
        self.observers.get(&event_type).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.observers.values().all(Vec::is_empty)
    }

    pub fn dispatch(&self, context: &EventContext<'_>) -> Result<(), ConnectorError> {
        let Some(observers) = self.observers.get(&context.event_type) else {
            return Ok(());
        };
        for observer in observers {
            observer(context).map_err(|source| ConnectorError::Observer {
                event_type: context.event_type.to_string(),
                source,
            })?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: HashMap<&str, usize> = self
            .observers
            .iter()
            .map(|(k, v)| (k.as_str(), v.len()))
            .collect();
        f.debug_struct("EventRegistry")
            .field("observers", &counts)
            .field("plugins", &self.plugins)
            .finish()
    }
}
