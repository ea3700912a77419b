//! Mutation reporter
//!
//! Replays intents through the transfer layer, one host call per intent.

use crate::boundary::Boundary;
use crate::intent::Intent;
use crate::transfer::{Transfer, TransferError};

/// Replay `intents` in order and return how many errors were issued.
///
/// Stops at the first intent that cannot be sent; everything before it has
/// already reached the host.
pub fn report<'i, B, I>(transfer: &mut Transfer<'_, B>, intents: I) -> Result<usize, TransferError>
where
    B: Boundary + ?Sized,
    I: IntoIterator<Item = &'i Intent>,
{
    let mut errors = 0;

    for intent in intents {
        match intent {
            Intent::ReportError { field, message } => {
                transfer.send_error(field, message);
                errors += 1;
            }
            Intent::ReportWarning { field, message } => transfer.send_warning(field, message),
            Intent::SetRequired { field, required } => transfer.send_required(field, *required),
            Intent::SetDisplay { field, display } => transfer.send_display(field, *display),
            Intent::SetValue { field, value } => transfer.send_value(field, value)?,
            Intent::Diagnostic { text } => transfer.send_diagnostic(text),
        }
    }

    Ok(errors)
}
