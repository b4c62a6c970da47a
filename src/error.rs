use serde::Serialize;
use thiserror::Error;

/// Reasons an input is rejected as an IBAN. Each validation yields at most one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IbanError {
    #[error("IBAN is too short")]
    NumberTooShort,
    #[error("IBAN is too long")]
    NumberTooLong,
    #[error("IBAN contains invalid characters")]
    InvalidCharacters,
    #[error("IBAN check digits are invalid")]
    CheckSumIncorrect,
    #[error("IBAN country code is not supported")]
    UnknownCountry,
}

impl IbanError {
    /// Stable name used in JSON bodies and CSV reports.
    pub fn kind(&self) -> &'static str {
        match self {
            IbanError::NumberTooShort => "number_too_short",
            IbanError::NumberTooLong => "number_too_long",
            IbanError::InvalidCharacters => "invalid_characters",
            IbanError::CheckSumIncorrect => "check_sum_incorrect",
            IbanError::UnknownCountry => "unknown_country",
        }
    }
}
