use thiserror::Error;

#[derive(Error, Debug)]
pub enum KingdomError {
    #[error("Ruler left office after year {year}; no further years can be tallied")]
    LeftOffice { year: u32 },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, KingdomError>;
