pub mod provider;
pub mod seed;
pub mod cloud_asset;

pub use provider::*;
pub use seed::*;
pub use cloud_asset::*;
