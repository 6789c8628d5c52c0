use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("Writer error: {0}")]
    Writer(#[from] WriterError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Missing required configuration: {0}")]
    MissingField(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Failed to start browser session: {0}")]
    Init(String),

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Marker element '.{marker}' did not appear within {waited_secs}s")]
    RenderTimeout { marker: String, waited_secs: u64 },

    #[error("Browser command failed: {0}")]
    Command(String),
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Failed to parse HTML: {0}")]
    Parse(String),

    #[error("Selector error: {0}")]
    Selector(String),

    #[error("No element matched required query: {0}")]
    NoMatch(String),

    #[error("Item group {group} is missing its '{field}' field")]
    Alignment { group: usize, field: &'static str },
}

#[derive(Error, Debug)]
pub enum WriterError {
    #[error("Expected a record or a sequence of records, got {0}")]
    InvalidInput(String),

    #[error("Failed to write records: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
