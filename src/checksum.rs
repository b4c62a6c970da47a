use crate::error::IbanError;
use crate::reference::{iban_length, MAX_IBAN_LENGTH, MIN_IBAN_LENGTH};
use std::cmp::Ordering;

/// Digits folded into the remainder per step. 96 * 10^9 + (10^9 - 1) fits in u64.
const CHUNK_DIGITS: usize = 9;

/// Runs the structural gates in order and stops at the first failure.
///
/// Lower-case letters are accepted and treated as upper-case.
pub fn validate(input: &str) -> Result<(), IbanError> {
    let len = input.chars().count();
    if len < MIN_IBAN_LENGTH {
        return Err(IbanError::NumberTooShort);
    }
    if len > MAX_IBAN_LENGTH {
        return Err(IbanError::NumberTooLong);
    }
    if !input.chars().all(|ch| ch.is_ascii_alphanumeric()) {
        return Err(IbanError::InvalidCharacters);
    }

    // ASCII from here on, so byte offsets are character offsets.
    let country = input[0..2].to_ascii_uppercase();
    let expected = iban_length(&country).ok_or(IbanError::UnknownCountry)?;
    match len.cmp(&expected) {
        Ordering::Less => return Err(IbanError::NumberTooShort),
        Ordering::Greater => return Err(IbanError::NumberTooLong),
        Ordering::Equal => {}
    }

    let numeral = to_numeral(&rearrange(input))?;
    if mod97(&numeral) != 1 {
        return Err(IbanError::CheckSumIncorrect);
    }
    Ok(())
}

/// Moves country code and check digits to the end. Expects at least four ASCII characters.
pub fn rearrange(iban: &str) -> String {
    format!("{}{}", &iban[4..], &iban[0..4])
}

/// Replaces letters by their two-digit value (A=10 .. Z=35), keeps digits.
pub fn to_numeral(rearranged: &str) -> Result<String, IbanError> {
    let mut out = String::with_capacity(rearranged.len() * 2);
    for ch in rearranged.chars() {
        if ch.is_ascii_digit() {
            out.push(ch);
        } else if ch.is_ascii_alphabetic() {
            let val = ch.to_ascii_uppercase() as u32 - 'A' as u32 + 10;
            out.push_str(&val.to_string());
        } else {
            return Err(IbanError::InvalidCharacters);
        }
    }
    Ok(out)
}

/// Remainder of an arbitrarily long decimal numeral modulo 97.
///
/// Non-digit bytes are not expected; `to_numeral` output only.
pub fn mod97(digits: &str) -> u32 {
    let mut remainder: u64 = 0;
    for chunk in digits.as_bytes().chunks(CHUNK_DIGITS) {
        let value = chunk
            .iter()
            .fold(0u64, |acc, byte| acc * 10 + u64::from(byte - b'0'));
        remainder = (remainder * 10u64.pow(chunk.len() as u32) + value) % 97;
    }
    remainder as u32
}
