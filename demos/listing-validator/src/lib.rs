//! Listing Validator (WASM)
//!
//! Rejects listings without a positive list price, and only asks for a
//! close price once the listing is closed.
//!
//! Build with `cargo build -p listing-validator --target wasm32-unknown-unknown --release`
//! and run the result with `reso-host`.

pub mod listing;
pub mod rules;

pub use listing::{Listing, MlsStatus};
pub use rules::evaluate;

reso_validator_sdk::define_validator!(rules::evaluate);
