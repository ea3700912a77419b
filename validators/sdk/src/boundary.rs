//! The raw host boundary
//!
//! Every method here maps to exactly one `reso.*` host call. Strings are
//! passed as UTF-8 and flags as the `0`/`1` integers the host expects.

/// Which record snapshot a transfer refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Snapshot {
    /// The record being saved (`reso.data`)
    Current,
    /// The previously persisted record (`reso.previous_data`)
    Previous,
}

impl Snapshot {
    /// Name of the host call serving this snapshot
    pub fn call_name(self) -> &'static str {
        match self {
            Snapshot::Current => "data",
            Snapshot::Previous => "previous_data",
        }
    }
}

impl std::fmt::Display for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.call_name())
    }
}

/// Host calls available to a validation module.
///
/// Implemented by [`crate::WasmHost`] inside the sandbox and by
/// [`crate::testing::RecordingHost`] for native tests.
pub trait Boundary {
    /// Phase one of a fetch: ask for the record size without a destination.
    fn probe_size(&mut self, snapshot: Snapshot) -> i32;

    /// Phase two of a fetch: ask the host to fill `buf`.
    ///
    /// Returns the size the host reports. The host only writes when the
    /// buffer is large enough to hold the whole record.
    fn fill(&mut self, snapshot: Snapshot, buf: &mut [u8]) -> i32;

    fn diagnostic(&mut self, text: &str);

    fn error(&mut self, field: &str, message: &str);

    fn warn(&mut self, field: &str, message: &str);

    fn set_required(&mut self, field: &str, value: i32);

    fn set_display(&mut self, field: &str, value: i32);

    /// Overwrite a field with JSON-encoded `value`
    fn set(&mut self, field: &str, value: &[u8]);
}
