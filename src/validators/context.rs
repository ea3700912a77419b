//! Validation context - data served to modules

use super::result::{HostCall, ValidationReport, ValidationError};
use std::path::Path;
use tracing::debug;
use wasmtime::{StoreLimits, StoreLimitsBuilder};

/// Which snapshot a transfer call asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Snapshot {
    Current,
    Previous,
}

/// Current and previous record, as compact JSON text
///
/// An empty `previous` means the record is new; the module sees a size of
/// zero when it probes for it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordPair {
    pub current: String,
    pub previous: String,
}

impl RecordPair {
    /// Build a pair from parsed JSON values
    pub fn from_values(current: &serde_json::Value, previous: Option<&serde_json::Value>) -> Self {
        Self {
            current: current.to_string(),
            previous: previous.map(|value| value.to_string()).unwrap_or_default(),
        }
    }

    /// Load records from JSON files
    pub fn from_files(current: &Path, previous: Option<&Path>) -> Result<Self, ValidationError> {
        let current = read_json(current)?;
        let previous = previous.map(read_json).transpose()?;
        Ok(Self::from_values(&current, previous.as_ref()))
    }

    pub fn bytes(&self, snapshot: Snapshot) -> &[u8] {
        match snapshot {
            Snapshot::Current => self.current.as_bytes(),
            Snapshot::Previous => self.previous.as_bytes(),
        }
    }
}

fn read_json(path: &Path) -> Result<serde_json::Value, ValidationError> {
    let contents = std::fs::read(path).map_err(|e| ValidationError::Record {
        path: path.to_path_buf(),
        message: format!("failed to read: {}", e),
    })?;

    serde_json::from_slice(&contents).map_err(|e| ValidationError::Record {
        path: path.to_path_buf(),
        message: format!("not JSON: {}", e),
    })
}

/// Per-invocation store data
///
/// Created fresh for every call to `validate()` and consumed into a
/// [`ValidationReport`] afterwards.
pub struct HostContext {
    records: RecordPair,
    calls: Vec<HostCall>,
    pub(crate) limits: StoreLimits,
}

impl HostContext {
    pub fn new(records: RecordPair, max_memory_bytes: usize) -> Self {
        Self {
            records,
            calls: Vec::new(),
            limits: StoreLimitsBuilder::new()
                .memory_size(max_memory_bytes)
                .instances(1)
                .trap_on_grow_failure(true)
                .build(),
        }
    }

    pub fn records(&self) -> &RecordPair {
        &self.records
    }

    /// Record an outgoing call from the module
    pub fn record(&mut self, call: HostCall) {
        debug!("module call: {:?}", call);
        self.calls.push(call);
    }

    pub fn into_report(self) -> ValidationReport {
        ValidationReport { calls: self.calls }
    }
}
