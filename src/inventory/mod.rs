pub mod api;
pub mod client;
pub mod gateway;

pub use api::InventoryApi;
pub use client::AsmClient;
pub use gateway::{SubmissionGateway, SubmissionOutcome};
