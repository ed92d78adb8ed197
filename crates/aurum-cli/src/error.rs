use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] aurum_core::ValidationError),

    #[error(transparent)]
    Config(#[from] aurum_core::ConfigError),

    #[error(transparent)]
    Storage(#[from] aurum_core::StorageError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) | Self::Config(_) => 2,
            Self::Storage(_) | Self::Serialization(_) | Self::Io(_) => 10,
        }
    }
}
