//! One validation pass, from fetch to report

use crate::boundary::Boundary;
use crate::decode::{DecodeError, Records};
use crate::intent::Intents;
use crate::reporter;
use crate::transfer::{Transfer, TransferError};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Why an invocation stopped early
#[derive(Debug, Error, PartialEq)]
pub enum AbortReason {
    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Terminal state of an invocation
#[derive(Debug, PartialEq)]
pub enum Outcome {
    /// Every intent was replayed. The record passed if `errors` is zero.
    Completed { errors: usize },
    /// A fatal failure was reported through one diagnostic; nothing else
    /// was issued after it.
    Aborted(AbortReason),
}

impl Outcome {
    pub fn passed(&self) -> bool {
        matches!(self, Outcome::Completed { errors: 0 })
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, Outcome::Aborted(_))
    }
}

/// Run `rules` against the records the host provides.
///
/// The rule set is a pure function of `(current, previous)`. All host
/// traffic happens here, before and after it runs.
pub fn invoke<B, R, F>(boundary: &mut B, rules: F) -> Outcome
where
    B: Boundary + ?Sized,
    R: DeserializeOwned + Default,
    F: FnOnce(&R, &R) -> Intents,
{
    let mut transfer = Transfer::new(boundary);

    match run(&mut transfer, rules) {
        Ok(errors) => Outcome::Completed { errors },
        Err(reason) => {
            transfer.send_diagnostic(&reason.to_string());
            Outcome::Aborted(reason)
        }
    }
}

fn run<B, R, F>(transfer: &mut Transfer<'_, B>, rules: F) -> Result<usize, AbortReason>
where
    B: Boundary + ?Sized,
    R: DeserializeOwned + Default,
    F: FnOnce(&R, &R) -> Intents,
{
    let current = transfer.fetch_current_bytes()?;
    let previous = transfer.fetch_previous_bytes()?;
    let records: Records<R> = Records::decode(&current, &previous)?;

    let intents = rules(&records.current, &records.previous);

    Ok(reporter::report(transfer, &intents)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::Snapshot;
    use crate::testing::{BoundaryCall, RecordingHost};
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Item {
        #[serde(rename = "Quantity")]
        quantity: i64,
    }

    fn quantity_rules(current: &Item, previous: &Item) -> Intents {
        let mut intents = Intents::new();
        if current.quantity < 0 {
            intents.error("Quantity", "Quantity cannot be negative");
        }
        if current.quantity != previous.quantity {
            intents.set("Changed", true);
        }
        intents
    }

    #[test]
    fn test_completed_invocation() {
        let mut host = RecordingHost::new(br#"{"Quantity": 3}"#, b"");
        let outcome = invoke(&mut host, quantity_rules);

        assert_eq!(outcome, Outcome::Completed { errors: 0 });
        assert!(outcome.passed());
        assert_eq!(
            host.field_calls(),
            vec![&BoundaryCall::Set("Changed".into(), "true".into())]
        );
    }

    #[test]
    fn test_errors_do_not_stop_evaluation() {
        let mut host = RecordingHost::new(br#"{"Quantity": -1}"#, br#"{"Quantity": 2}"#);
        let outcome = invoke(&mut host, quantity_rules);

        assert_eq!(outcome, Outcome::Completed { errors: 1 });
        assert!(!outcome.passed());
        assert_eq!(host.field_calls().len(), 2);
    }

    #[test]
    fn test_malformed_current_aborts_with_one_diagnostic() {
        let mut host = RecordingHost::new(b"{not json", b"");
        let outcome = invoke(&mut host, quantity_rules);

        assert!(outcome.is_aborted());
        assert_eq!(host.diagnostics().len(), 1);
        assert!(host.diagnostics()[0].starts_with("data was not a valid record"));
        assert!(host.field_calls().is_empty());
    }

    #[test]
    fn test_malformed_previous_aborts() {
        let mut host = RecordingHost::new(br#"{"Quantity": 1}"#, br#""Closed""#);
        let outcome = invoke(&mut host, quantity_rules);

        assert!(matches!(
            outcome,
            Outcome::Aborted(AbortReason::Decode(DecodeError {
                snapshot: Snapshot::Previous,
                ..
            }))
        ));
        assert_eq!(host.diagnostics().len(), 1);
        assert!(host.field_calls().is_empty());
    }

    #[test]
    fn test_size_mismatch_aborts_before_decoding() {
        let mut host =
            RecordingHost::new(br#"{"Quantity": 1}"#, b"").with_fill_size(Snapshot::Current, 3);
        let outcome = invoke(&mut host, quantity_rules);

        assert!(matches!(
            outcome,
            Outcome::Aborted(AbortReason::Transfer(TransferError::SizeMismatch { .. }))
        ));
        assert!(!host.calls().contains(&BoundaryCall::Probe(Snapshot::Previous)));
        assert_eq!(host.diagnostics().len(), 1);
    }

    #[test]
    fn test_encode_failure_aborts_after_earlier_calls() {
        let mut host = RecordingHost::new(b"{}", b"");
        let outcome = invoke(&mut host, |_: &Item, _: &Item| {
            let mut intents = Intents::new();
            intents
                .required("Rooms", true)
                .set("Rooms", serde_json::json!([1]))
                .display("Rooms", true);
            intents
        });

        assert!(outcome.is_aborted());
        assert_eq!(
            host.field_calls(),
            vec![&BoundaryCall::SetRequired("Rooms".into(), 1)]
        );
        assert_eq!(host.diagnostics(), vec!["value for Rooms is not a scalar"]);
    }
}
