use thiserror::Error;

use crate::ical::expand::ConversionError;

/// iCalendar value and recurrence errors
#[derive(Error, Debug)]
pub enum RfcError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Unusable recurrence rule: {0}")]
    RecurrenceRule(String),

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

pub type RfcResult<T> = std::result::Result<T, RfcError>;
