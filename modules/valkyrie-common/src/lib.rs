pub mod config;
pub mod types;

pub use config::{Config, StoreBackend};
pub use types::*;
