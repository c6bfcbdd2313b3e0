pub mod analysis;
pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod platform;
pub mod scanner;

pub use config::{AppSettings, ConfigEntry};
pub use engine::{RetentionEngine, RetentionPlan, RunSummary};
pub use error::Error;
pub use index::ConfigIndex;
