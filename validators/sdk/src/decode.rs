//! Record decoder

use crate::boundary::Snapshot;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Record bytes that do not match the rule set's schema
#[derive(Debug, Error, PartialEq)]
#[error("{snapshot} was not a valid record: {message}")]
pub struct DecodeError {
    pub snapshot: Snapshot,
    pub message: String,
}

/// Decode record bytes into the rule set's schema.
///
/// Empty input and JSON `null` mean "no record" and decode to
/// `T::default()`. Anything else must be valid JSON matching `T`.
pub fn decode<T>(snapshot: Snapshot, bytes: &[u8]) -> Result<T, DecodeError>
where
    T: DeserializeOwned + Default,
{
    if bytes.trim_ascii().is_empty() {
        return Ok(T::default());
    }

    let value: Option<T> = serde_json::from_slice(bytes).map_err(|e| DecodeError {
        snapshot,
        message: e.to_string(),
    })?;

    Ok(value.unwrap_or_default())
}

/// Current and previous snapshots of one record
#[derive(Debug, Clone, PartialEq)]
pub struct Records<T> {
    pub current: T,
    pub previous: T,
}

impl<T> Records<T>
where
    T: DeserializeOwned + Default,
{
    pub fn decode(current: &[u8], previous: &[u8]) -> Result<Self, DecodeError> {
        Ok(Self {
            current: decode(Snapshot::Current, current)?,
            previous: decode(Snapshot::Previous, previous)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, PartialEq, Deserialize)]
    #[serde(default)]
    struct Sample {
        #[serde(rename = "Amount")]
        amount: f64,
        #[serde(rename = "Status")]
        status: String,
    }

    #[test]
    fn test_empty_bytes_decode_to_default() {
        let sample: Sample = decode(Snapshot::Previous, b"").unwrap();
        assert_eq!(sample, Sample::default());

        let sample: Sample = decode(Snapshot::Previous, b"  \n").unwrap();
        assert_eq!(sample, Sample::default());
    }

    #[test]
    fn test_null_decodes_to_default() {
        let sample: Sample = decode(Snapshot::Previous, b"null").unwrap();
        assert_eq!(sample, Sample::default());
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let sample: Sample =
            decode(Snapshot::Current, br#"{"amount": 5, "Status": "Closed"}"#).unwrap();
        assert_eq!(sample.amount, 0.0);
        assert_eq!(sample.status, "Closed");
    }

    #[test]
    fn test_malformed_bytes_fail() {
        let err = decode::<Sample>(Snapshot::Current, b"{\"Amount\":").unwrap_err();
        assert_eq!(err.snapshot, Snapshot::Current);
        assert!(err.to_string().starts_with("data was not a valid record"));
    }

    #[test]
    fn test_schema_violation_fails() {
        let err = decode::<Sample>(Snapshot::Previous, br#"{"Amount": "lots"}"#).unwrap_err();
        assert_eq!(err.snapshot, Snapshot::Previous);
    }

    #[test]
    fn test_records_decode_pair() {
        let records: Records<Sample> = Records::decode(br#"{"Amount": 10}"#, b"").unwrap();
        assert_eq!(records.current.amount, 10.0);
        assert_eq!(records.previous, Sample::default());
    }
}
