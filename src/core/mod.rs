pub mod config;
pub mod error;

pub use config::BatchConfig;
pub use error::{KingdomError, Result};
