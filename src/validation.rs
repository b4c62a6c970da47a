use crate::checksum;
use crate::error::IbanError;
use serde::Serialize;

/// Validates `iban` and reports `(valid, error)`. Exactly one of the two is set.
pub fn validate_iban(iban: &str) -> (bool, Option<IbanError>) {
    match checksum::validate(iban) {
        Ok(()) => (true, None),
        Err(err) => (false, Some(err)),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    pub iban: String,
    pub valid: bool,
    pub error: Option<IbanError>,
}

impl ValidationOutcome {
    pub fn from_input(iban: &str) -> Self {
        let (valid, error) = validate_iban(iban);
        Self {
            iban: iban.to_string(),
            valid,
            error,
        }
    }
}
