//! In-memory host for exercising validation modules natively

use crate::boundary::{Boundary, Snapshot};

/// One call as observed by [`RecordingHost`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryCall {
    Probe(Snapshot),
    /// Fill request with the destination length
    Fill(Snapshot, usize),
    Diagnostic(String),
    Error(String, String),
    Warn(String, String),
    SetRequired(String, i32),
    SetDisplay(String, i32),
    /// Field and the JSON text of the value
    Set(String, String),
}

impl BoundaryCall {
    /// Whether this call mutates field state or reports on a field
    pub fn is_field_call(&self) -> bool {
        matches!(
            self,
            BoundaryCall::Error(..)
                | BoundaryCall::Warn(..)
                | BoundaryCall::SetRequired(..)
                | BoundaryCall::SetDisplay(..)
                | BoundaryCall::Set(..)
        )
    }
}

/// Host double serving fixed record bytes and logging every call
#[derive(Debug, Default)]
pub struct RecordingHost {
    current: Vec<u8>,
    previous: Vec<u8>,
    probe_override: Vec<(Snapshot, i32)>,
    fill_override: Vec<(Snapshot, i32)>,
    calls: Vec<BoundaryCall>,
}

impl RecordingHost {
    pub fn new(current: &[u8], previous: &[u8]) -> Self {
        Self {
            current: current.to_vec(),
            previous: previous.to_vec(),
            ..Self::default()
        }
    }

    /// Make the size probe for `snapshot` report `size`
    pub fn with_probe_size(mut self, snapshot: Snapshot, size: i32) -> Self {
        self.probe_override.push((snapshot, size));
        self
    }

    /// Make the fill for `snapshot` report `size`
    pub fn with_fill_size(mut self, snapshot: Snapshot, size: i32) -> Self {
        self.fill_override.push((snapshot, size));
        self
    }

    pub fn calls(&self) -> &[BoundaryCall] {
        &self.calls
    }

    pub fn into_calls(self) -> Vec<BoundaryCall> {
        self.calls
    }

    pub fn diagnostics(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                BoundaryCall::Diagnostic(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// `(field, message)` pairs reported through `error`
    pub fn errors(&self) -> Vec<(&str, &str)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                BoundaryCall::Error(field, message) => Some((field.as_str(), message.as_str())),
                _ => None,
            })
            .collect()
    }

    /// Calls that touch a field, in issue order
    pub fn field_calls(&self) -> Vec<&BoundaryCall> {
        self.calls.iter().filter(|call| call.is_field_call()).collect()
    }

    fn record(&self, snapshot: Snapshot) -> &[u8] {
        match snapshot {
            Snapshot::Current => &self.current,
            Snapshot::Previous => &self.previous,
        }
    }

    fn overridden(overrides: &[(Snapshot, i32)], snapshot: Snapshot) -> Option<i32> {
        overrides
            .iter()
            .find(|(s, _)| *s == snapshot)
            .map(|(_, size)| *size)
    }
}

impl Boundary for RecordingHost {
    fn probe_size(&mut self, snapshot: Snapshot) -> i32 {
        self.calls.push(BoundaryCall::Probe(snapshot));
        Self::overridden(&self.probe_override, snapshot)
            .unwrap_or(self.record(snapshot).len() as i32)
    }

    fn fill(&mut self, snapshot: Snapshot, buf: &mut [u8]) -> i32 {
        self.calls.push(BoundaryCall::Fill(snapshot, buf.len()));
        let record = self.record(snapshot);
        if record.len() <= buf.len() {
            buf[..record.len()].copy_from_slice(record);
        }
        Self::overridden(&self.fill_override, snapshot).unwrap_or(record.len() as i32)
    }

    fn diagnostic(&mut self, text: &str) {
        self.calls.push(BoundaryCall::Diagnostic(text.to_string()));
    }

    fn error(&mut self, field: &str, message: &str) {
        self.calls
            .push(BoundaryCall::Error(field.to_string(), message.to_string()));
    }

    fn warn(&mut self, field: &str, message: &str) {
        self.calls
            .push(BoundaryCall::Warn(field.to_string(), message.to_string()));
    }

    fn set_required(&mut self, field: &str, value: i32) {
        self.calls
            .push(BoundaryCall::SetRequired(field.to_string(), value));
    }

    fn set_display(&mut self, field: &str, value: i32) {
        self.calls
            .push(BoundaryCall::SetDisplay(field.to_string(), value));
    }

    fn set(&mut self, field: &str, value: &[u8]) {
        self.calls.push(BoundaryCall::Set(
            field.to_string(),
            String::from_utf8_lossy(value).into_owned(),
        ));
    }
}
