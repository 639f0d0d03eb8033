pub mod audit;
pub mod tracing_log;

pub use audit::AuditLogPlugin;
pub use tracing_log::TracingPlugin;
