use base64::prelude::*;
use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

use crate::shared::constants::{MAX_SIGNATURE_SIZE, PNG_DATA_URL_PREFIX};

lazy_static! {
    /// Meter index: digits with an optional decimal part, comma or dot
    /// - Valid: "12345", "0", "1234.5", "1234,56"
    /// - Invalid: "", "12a", "-3", "1.2.3", " 12"
    pub static ref METER_INDEX_REGEX: Regex = Regex::new(r"^\d+([.,]\d+)?$").unwrap();

    /// French phone number, national or +33 form, separators allowed
    /// - Valid: "0612345678", "06 12 34 56 78", "+33 6 12 34 56 78", "01.23.45.67.89"
    /// - Invalid: "12345", "0712", "+44 20 7946 0958"
    pub static ref PHONE_REGEX: Regex =
        Regex::new(r"^(?:\+33\s?|0)[1-9](?:[\s.\-]?\d{2}){4}$").unwrap();

    /// French postcode, five digits
    pub static ref POSTCODE_REGEX: Regex = Regex::new(r"^\d{5}$").unwrap();

    /// Appointment time, 24h `HH:MM`
    pub static ref TIME_REGEX: Regex = Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").unwrap();
}

/// Parse a meter index once it matched `METER_INDEX_REGEX`
pub fn parse_meter_index(value: &str) -> Option<f64> {
    if !METER_INDEX_REGEX.is_match(value) {
        return None;
    }
    value.replace(',', ".").parse::<f64>().ok()
}

/// Signature images must be non-empty PNG data URLs
pub fn validate_png_data_url(value: &str) -> Result<(), ValidationError> {
    let Some(encoded) = value.strip_prefix(PNG_DATA_URL_PREFIX) else {
        return Err(ValidationError::new("png_data_url")
            .with_message("Signature must be a PNG data URL".into()));
    };

    let decoded = BASE64_STANDARD.decode(encoded).map_err(|_| {
        ValidationError::new("png_data_url").with_message("Signature is not valid base64".into())
    })?;

    // PNG magic number
    if decoded.len() < 8 || decoded[..8] != [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A] {
        return Err(ValidationError::new("png_data_url")
            .with_message("Signature image is not a PNG".into()));
    }

    if decoded.len() > MAX_SIGNATURE_SIZE {
        return Err(ValidationError::new("png_data_url")
            .with_message("Signature image is too large".into()));
    }

    Ok(())
}

pub fn validate_consent(value: &bool) -> Result<(), ValidationError> {
    if *value {
        Ok(())
    } else {
        Err(ValidationError::new("consent").with_message("Consent is required to sign".into()))
    }
}

pub fn validate_meter_index(value: &str) -> Result<(), ValidationError> {
    if METER_INDEX_REGEX.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::new("meter_index").with_message("Index must be a number".into()))
    }
}

#[cfg(test)]
pub fn tiny_png_data_url() -> String {
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend_from_slice(b"IHDR-test-payload");
    format!("{}{}", PNG_DATA_URL_PREFIX, BASE64_STANDARD.encode(bytes))
}
