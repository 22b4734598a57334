pub mod env;
mod loader;
pub mod monitor;

pub use env::AppConfig;
pub use loader::load_config;
pub use monitor::{ForwardConfig, KeywordConfig};
