//! Validation module host
//!
//! Loads RESO validation modules and serves the `reso` host calls they
//! import. Each call to [`Validator::validate`] is one self-contained
//! invocation of the module's `validate()` export.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │       WasmValidator                     │
//! ├─────────────────────────────────────────┤
//! │  • Fresh store + instance per call      │
//! │  • Fuel and memory limits               │
//! │  • Collects outgoing calls              │
//! └────────┬────────────────────────────────┘
//!          │ imports
//!          ├──> reso.data / reso.previous_data   (two-phase transfer)
//!          ├──> reso.error / reso.warn           (field reports)
//!          ├──> reso.set_required / set_display  (field control)
//!          ├──> reso.set                         (value override)
//!          └──> reso.diagnostic                  (operator log)
//! ```
//!
//! # Example Usage
//!
//! ```rust,ignore
//! let runtime = Arc::new(WasmRuntime::new(&config.runtime)?);
//! let validator = WasmValidator::from_file("listing".into(), path, runtime)?;
//!
//! let execution = validator.validate(&records).await?;
//! if execution.passed() {
//!     println!("✅ Validation passed");
//! }
//! ```

pub mod context;
pub mod result;
pub mod traits;
pub mod wasm;

// Re-export commonly used types
pub use context::{HostContext, RecordPair};
pub use result::{Execution, ExecutionStatus, HostCall, ValidationError};
pub use traits::Validator;
