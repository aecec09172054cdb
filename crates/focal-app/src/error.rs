use thiserror::Error;

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    RfcError(#[from] focal_rfc::error::RfcError),

    #[error(transparent)]
    CoreError(#[from] focal_core::error::CoreError),

    #[error("Failed to load calendar file {path}: {source}")]
    FixtureError {
        path: String,
        #[source]
        source: config::ConfigError,
    },
}

pub type AppResult<T> = std::result::Result<T, AppError>;
