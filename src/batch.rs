use crate::error::IbanError;
use crate::validation::ValidationOutcome;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub by_error: BTreeMap<IbanError, usize>,
}

impl BatchReport {
    fn new() -> Self {
        Self {
            total: 0,
            valid: 0,
            invalid: 0,
            by_error: BTreeMap::new(),
        }
    }

    fn record(&mut self, iban: &str) -> ValidationOutcome {
        let outcome = ValidationOutcome::from_input(iban);
        self.total += 1;
        if outcome.valid {
            self.valid += 1;
        } else {
            self.invalid += 1;
        }
        if let Some(err) = outcome.error {
            *self.by_error.entry(err).or_insert(0) += 1;
        }
        outcome
    }
}

/// Validates every IBAN in `input`.
///
/// A first row containing `column` (case-insensitive) is a header selecting
/// that column; otherwise the file is headerless and the first field is used.
pub fn validate_file(
    input: &Path,
    column: &str,
    output: Option<&Path>,
) -> Result<BatchReport, String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(input)
        .map_err(|err| format!("{}: {}", input.display(), err))?;
    let mut writer = match output {
        Some(path) => Some(csv::Writer::from_path(path).map_err(|err| err.to_string())?),
        None => None,
    };

    let mut report = BatchReport::new();
    let mut index: Option<usize> = None;
    for result in reader.records() {
        let record = result.map_err(|err| err.to_string())?;
        let idx = match index {
            Some(idx) => idx,
            None => {
                let header = record
                    .iter()
                    .position(|field| field.eq_ignore_ascii_case(column));
                index = Some(header.unwrap_or(0));
                if let Some(idx) = header {
                    log::debug!("using column '{}' at index {}", column, idx);
                    continue;
                }
                log::debug!("no '{}' header found, reading first field", column);
                0
            }
        };

        let iban = record.get(idx).unwrap_or("");
        let outcome = report.record(iban);
        if !outcome.valid {
            log::debug!(
                "invalid IBAN {}: {}",
                outcome.iban,
                outcome.error.map_or("", |err| err.kind())
            );
        }
        if let Some(writer) = writer.as_mut() {
            writer.serialize(&outcome).map_err(|err| err.to_string())?;
        }
    }

    if let Some(mut writer) = writer {
        writer.flush().map_err(|err| err.to_string())?;
    }
    Ok(report)
}
