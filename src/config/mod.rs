pub mod parser;
pub mod schema;
pub mod types;
pub mod credentials;

pub use types::*;
pub use parser::{parse_settings, parse_settings_str, validate_settings};
