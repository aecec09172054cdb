use thiserror::Error;

/// Week view errors
#[derive(Error, Debug)]
pub enum ViewError {
    #[error(transparent)]
    Rfc(#[from] focal_rfc::error::RfcError),

    #[error(transparent)]
    Conversion(#[from] focal_rfc::ical::expand::ConversionError),

    #[error(transparent)]
    Core(#[from] focal_core::error::CoreError),

    #[error("Event is missing required property: {0}")]
    MissingProperty(&'static str),

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    #[error("Week {week} does not exist in {year}")]
    InvalidWeek { year: i32, week: u32 },
}

pub type ViewResult<T> = std::result::Result<T, ViewError>;
