//! Transfer layer
//!
//! Typed operations over a [`Boundary`]: the two-phase record fetch and the
//! one-way outgoing calls. Nothing here waits for, or receives, an
//! acknowledgment from the host.

use crate::boundary::{Boundary, Snapshot};
use serde::Serialize;
use thiserror::Error;

/// Fatal failure on the transfer path
#[derive(Debug, Error, PartialEq)]
pub enum TransferError {
    /// The host reported a negative record size
    #[error("{snapshot} reported an invalid size of {size}")]
    InvalidSize { snapshot: Snapshot, size: i32 },

    /// The fill did not report the size announced by the probe
    #[error("{snapshot} announced {expected} bytes but reported {actual} on fill")]
    SizeMismatch {
        snapshot: Snapshot,
        expected: usize,
        actual: i32,
    },

    /// An outgoing value could not be serialized
    #[error("failed to encode value for {field}: {message}")]
    Encode { field: String, message: String },

    /// Outgoing values must be JSON scalars or null
    #[error("value for {field} is not a scalar")]
    NonScalarValue { field: String },
}

/// The module's only route to the host
pub struct Transfer<'a, B: Boundary + ?Sized> {
    boundary: &'a mut B,
}

impl<'a, B: Boundary + ?Sized> Transfer<'a, B> {
    pub fn new(boundary: &'a mut B) -> Self {
        Self { boundary }
    }

    /// Fetch the bytes of the record being saved
    pub fn fetch_current_bytes(&mut self) -> Result<Vec<u8>, TransferError> {
        self.fetch(Snapshot::Current)
    }

    /// Fetch the bytes of the previously persisted record
    ///
    /// An empty buffer means there is no previous record.
    pub fn fetch_previous_bytes(&mut self) -> Result<Vec<u8>, TransferError> {
        self.fetch(Snapshot::Previous)
    }

    fn fetch(&mut self, snapshot: Snapshot) -> Result<Vec<u8>, TransferError> {
        let size = self.boundary.probe_size(snapshot);
        let expected =
            usize::try_from(size).map_err(|_| TransferError::InvalidSize { snapshot, size })?;
        if expected == 0 {
            return Ok(Vec::new());
        }

        let mut buf = vec![0_u8; expected];
        let actual = self.boundary.fill(snapshot, &mut buf);
        if usize::try_from(actual).ok() != Some(expected) {
            return Err(TransferError::SizeMismatch {
                snapshot,
                expected,
                actual,
            });
        }

        Ok(buf)
    }

    pub fn send_diagnostic(&mut self, text: &str) {
        self.boundary.diagnostic(text);
    }

    pub fn send_error(&mut self, field: &str, message: &str) {
        self.boundary.error(field, message);
    }

    pub fn send_warning(&mut self, field: &str, message: &str) {
        self.boundary.warn(field, message);
    }

    pub fn send_required(&mut self, field: &str, required: bool) {
        self.boundary.set_required(field, required as i32);
    }

    pub fn send_display(&mut self, field: &str, display: bool) {
        self.boundary.set_display(field, display as i32);
    }

    /// Overwrite a field's value. `None` / JSON null clears it.
    pub fn send_value<T>(&mut self, field: &str, value: &T) -> Result<(), TransferError>
    where
        T: Serialize + ?Sized,
    {
        let encoded = serde_json::to_value(value).map_err(|e| TransferError::Encode {
            field: field.to_string(),
            message: e.to_string(),
        })?;
        if encoded.is_array() || encoded.is_object() {
            return Err(TransferError::NonScalarValue {
                field: field.to_string(),
            });
        }

        let bytes = serde_json::to_vec(&encoded).map_err(|e| TransferError::Encode {
            field: field.to_string(),
            message: e.to_string(),
        })?;
        self.boundary.set(field, &bytes);
        Ok(())
    }
}
