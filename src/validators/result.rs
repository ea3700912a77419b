//! Validation result types

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// One outgoing call made by a module, as received by the host
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum HostCall {
    /// Operator-facing log line
    Diagnostic { text: String },

    /// Field failed validation
    Error { field: String, message: String },

    /// Field has a warning; does not fail validation
    Warn { field: String, message: String },

    SetRequired { field: String, required: bool },

    SetDisplay { field: String, display: bool },

    /// Field value overwritten; `null` clears it
    Set { field: String, value: serde_json::Value },
}

impl HostCall {
    pub fn is_error(&self) -> bool {
        matches!(self, HostCall::Error { .. })
    }
}

impl std::fmt::Display for HostCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HostCall::Diagnostic { text } => write!(f, "ℹ️  {}", text),
            HostCall::Error { field, message } => write!(f, "❗️ {}: {}", field, message),
            HostCall::Warn { field, message } => write!(f, "⚠️  {}: {}", field, message),
            HostCall::SetRequired { field, required } => write!(
                f,
                "💬 {} is {}",
                field,
                if *required { "required" } else { "not required" }
            ),
            HostCall::SetDisplay { field, display } => write!(
                f,
                "💬 {} is {}",
                field,
                if *display { "visible" } else { "not visible" }
            ),
            HostCall::Set { field, value } => write!(f, "✏️  {} set to {}", field, value),
        }
    }
}

/// Everything a module reported during one invocation, in issue order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub calls: Vec<HostCall>,
}

impl ValidationReport {
    /// Passed means no error call was made
    pub fn passed(&self) -> bool {
        !self.calls.iter().any(HostCall::is_error)
    }

    /// `(field, message)` pairs of every error call
    pub fn errors(&self) -> Vec<(&str, &str)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HostCall::Error { field, message } => Some((field.as_str(), message.as_str())),
                _ => None,
            })
            .collect()
    }

    pub fn diagnostics(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HostCall::Diagnostic { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// How `validate()` ended
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum ExecutionStatus {
    Completed,
    /// The module trapped. Calls made before the trap are still reported.
    Aborted(String),
}

/// Result of running a module once
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Execution {
    pub status: ExecutionStatus,
    pub report: ValidationReport,
    /// Fuel consumed by the invocation
    pub fuel_consumed: u64,
}

impl Execution {
    pub fn is_aborted(&self) -> bool {
        matches!(self.status, ExecutionStatus::Aborted(_))
    }

    /// A validation only passes if it ran to completion without errors
    pub fn passed(&self) -> bool {
        !self.is_aborted() && self.report.passed()
    }
}

/// Error type for failures before or around module execution
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Record file unreadable or not JSON
    #[error("Record error in '{}': {message}", .path.display())]
    Record { path: PathBuf, message: String },

    /// Module could not be read or compiled
    #[error("Failed to load module: {0}")]
    Load(String),

    /// Module could not be instantiated
    #[error("Failed to instantiate module: {0}")]
    Instantiate(String),

    /// Module does not export `validate`
    #[error("Failed to get `validate` function from module: {0}")]
    MissingEntrypoint(String),

    /// Engine or blocking-task failure
    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl ValidationError {
    /// Process exit code used by the CLI
    pub fn exit_code(&self) -> i32 {
        match self {
            ValidationError::Record { .. } => 1,
            ValidationError::Load(_) => 2,
            ValidationError::Instantiate(_) => 3,
            ValidationError::MissingEntrypoint(_) => 4,
            ValidationError::Runtime(_) => 5,
        }
    }
}
