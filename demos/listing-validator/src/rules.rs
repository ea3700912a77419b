//! Listing rules

use crate::listing::{Listing, MlsStatus};
use reso_validator_sdk::{FieldControl, Intents};

pub const LIST_PRICE: &str = "ListPrice";
pub const CLOSE_PRICE: &str = "ClosePrice";

pub const LIST_PRICE_MESSAGE: &str = "List Price must be greater than $0";

/// Evaluate a listing against its previous version.
///
/// `ClosePrice` is governed here: its full state is restated on every call,
/// since the host may not keep flags from earlier invocations.
pub fn evaluate(current: &Listing, _previous: &Listing) -> Intents {
    let mut intents = Intents::new();

    if current.list_price <= 0.0 {
        intents.error(LIST_PRICE, LIST_PRICE_MESSAGE);
    }

    let close_price = if current.mls_status == MlsStatus::Closed {
        FieldControl::required()
    } else {
        FieldControl::not_applicable()
    };
    intents.control(CLOSE_PRICE, close_price);

    intents
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use reso_validator_sdk::Intent;
    use serde_json::Value;

    fn listing(list_price: f64, status: &str) -> Listing {
        Listing {
            list_price,
            mls_status: MlsStatus::from(status.to_string()),
        }
    }

    fn count(intents: &Intents, wanted: &Intent) -> usize {
        intents.iter().filter(|intent| *intent == wanted).count()
    }

    fn price_error() -> Intent {
        Intent::ReportError {
            field: LIST_PRICE.into(),
            message: LIST_PRICE_MESSAGE.into(),
        }
    }

    fn required(value: bool) -> Intent {
        Intent::SetRequired { field: CLOSE_PRICE.into(), required: value }
    }

    fn display(value: bool) -> Intent {
        Intent::SetDisplay { field: CLOSE_PRICE.into(), display: value }
    }

    fn cleared() -> Intent {
        Intent::SetValue { field: CLOSE_PRICE.into(), value: Value::Null }
    }

    fn any_status() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("Active".to_string()),
            Just("Pending".to_string()),
            Just("Closed".to_string()),
            Just("Withdrawn".to_string()),
            "[A-Za-z]{0,12}",
        ]
    }

    #[test]
    fn test_active_listing_hides_close_price() {
        let intents = evaluate(&listing(500000.0, "Active"), &Listing::default());

        assert_eq!(intents.as_slice(), &[required(false), display(false), cleared()]);
        assert_eq!(intents.error_count(), 0);
    }

    #[test]
    fn test_closed_listing_with_zero_price() {
        let intents = evaluate(&listing(0.0, "Closed"), &Listing::default());

        assert_eq!(intents.as_slice(), &[price_error(), required(true), display(true)]);
    }

    #[test]
    fn test_negative_price_is_an_error() {
        let intents = evaluate(&listing(-1.0, "Pending"), &listing(100.0, "Active"));
        assert_eq!(count(&intents, &price_error()), 1);
    }

    proptest! {
        #[test]
        fn non_positive_price_reports_one_error(price in -1.0e9..=0.0f64, status in any_status()) {
            let intents = evaluate(&listing(price, &status), &Listing::default());
            prop_assert_eq!(count(&intents, &price_error()), 1);
            prop_assert_eq!(intents.error_count(), 1);
        }

        #[test]
        fn open_listing_clears_close_price(price in 0.01..1.0e9f64, status in any_status()) {
            prop_assume!(status != "Closed");
            let intents = evaluate(&listing(price, &status), &Listing::default());

            prop_assert_eq!(intents.error_count(), 0);
            prop_assert_eq!(count(&intents, &required(false)), 1);
            prop_assert_eq!(count(&intents, &display(false)), 1);
            prop_assert_eq!(count(&intents, &cleared()), 1);
        }

        #[test]
        fn closed_listing_requires_close_price(price in -1.0e9..1.0e9f64) {
            let intents = evaluate(&listing(price, "Closed"), &Listing::default());

            prop_assert_eq!(count(&intents, &required(true)), 1);
            prop_assert_eq!(count(&intents, &display(true)), 1);
            prop_assert_eq!(count(&intents, &cleared()), 0);
        }

        #[test]
        fn evaluation_is_deterministic(
            price in -1.0e9..1.0e9f64,
            status in any_status(),
            previous_price in -1.0e9..1.0e9f64,
            previous_status in any_status(),
        ) {
            let current = listing(price, &status);
            let previous = listing(previous_price, &previous_status);

            let first = serde_json::to_vec(&evaluate(&current, &previous)).unwrap();
            let second = serde_json::to_vec(&evaluate(&current, &previous)).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
