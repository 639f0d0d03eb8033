use tracing::{debug, info};
use crate::connector::{EventContext, EventPayload, EventRegistry, EventType, Plugin};

/// Mirrors lifecycle events into the log. Found entities go to debug, the
/// rest to info.
#[derive(Debug, Default)]
pub struct TracingPlugin;

fn log_event(ctx: &EventContext<'_>) {
    let service = ctx.service.as_deref().unwrap_or("-");
    match &ctx.payload {
        EventPayload::Seed(seed) => {
            debug!(event = %ctx.event_type, provider = %ctx.provider, service, label = %seed.label, value = %seed.value, "Event");
        }
        EventPayload::CloudAsset(asset) => {
            debug!(event = %ctx.event_type, provider = %ctx.provider, service, uid = %asset.uid, value = %asset.value, "Event");
        }
        EventPayload::Count(count) => {
            info!(event = %ctx.event_type, provider = %ctx.provider, count, "Event");
        }
        EventPayload::Label(label) => {
            info!(event = %ctx.event_type, provider = %ctx.provider, label = %label, "Event");
        }
        EventPayload::None => {
            info!(event = %ctx.event_type, provider = %ctx.provider, "Event");
        }
    }
}

impl Plugin for TracingPlugin {
    fn name(&self) -> &str {
        "tracing"
    }

    fn register(&self, registry: &mut EventRegistry) {
        registry.register_many(&EventType::ALL, |ctx| {
            log_event(ctx);
            Ok(())
        });
    }
}
