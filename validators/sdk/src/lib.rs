//! RESO Validation Module SDK
//!
//! Helpers for writing validation modules that run inside a `reso` host
//! sandbox. A module exports a single `validate()` function. Everything it
//! knows arrives through host calls, and everything it decides leaves
//! through host calls:
//!
//! ```text
//!   host ──data / previous_data──▶ Transfer ──bytes──▶ decode ──records──▶ rules
//!                                                                         │
//!   host ◀──error / warn / set_*── Transfer ◀──────── report ◀──intents───┘
//! ```
//!
//! Records are fetched with a two-phase protocol: the module asks for the
//! size with an empty destination, allocates exactly that much, then asks
//! the host to fill it. Outgoing calls are one-way and unacknowledged.
//!
//! Rule sets are pure functions from `(current, previous)` to [`Intents`]
//! and can be tested natively against [`testing::RecordingHost`].
//!
//! # Example
//!
//! ```rust,no_run
//! use reso_validator_sdk::*;
//! use serde::Deserialize;
//!
//! #[derive(Default, Deserialize)]
//! #[serde(default)]
//! struct Listing {
//!     #[serde(rename = "ListPrice")]
//!     list_price: f64,
//! }
//!
//! fn rules(current: &Listing, _previous: &Listing) -> Intents {
//!     let mut intents = Intents::new();
//!     if current.list_price <= 0.0 {
//!         intents.error("ListPrice", "List Price must be greater than $0");
//!     }
//!     intents
//! }
//!
//! define_validator!(rules);
//! ```

pub mod boundary;
pub mod decode;
pub mod intent;
pub mod invocation;
pub mod reporter;
pub mod testing;
pub mod transfer;

#[cfg(target_arch = "wasm32")]
mod sys;

pub use boundary::{Boundary, Snapshot};
pub use decode::{decode, DecodeError, Records};
pub use intent::{FieldControl, Intent, Intents, ValueControl};
pub use invocation::{invoke, AbortReason, Outcome};
pub use reporter::report;
pub use transfer::{Transfer, TransferError};

#[cfg(target_arch = "wasm32")]
pub use sys::WasmHost;

/// Export `validate()` running the given rule function.
///
/// The rule function has the shape `fn(&R, &R) -> Intents` where `R` is the
/// record schema. A fatal failure is reported through one diagnostic and
/// then traps, so the host sees the invocation fail.
#[macro_export]
macro_rules! define_validator {
    ($rules_fn:path) => {
        #[cfg(target_arch = "wasm32")]
        #[unsafe(no_mangle)]
        pub extern "C" fn validate() {
            let mut host = $crate::WasmHost;
            if $crate::invoke(&mut host, $rules_fn).is_aborted() {
                ::core::arch::wasm32::unreachable();
            }
        }
    };
}
