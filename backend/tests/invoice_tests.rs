//! Invoice issuing tests
//!
//! The issuing contract: the amount defaults to the sale total unless
//! overridden, and a sale carries at most one invoice no matter how many
//! times issuing runs.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;

use shared::reconcile::sale_total;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[derive(Debug, Clone, PartialEq)]
struct InvoiceRow {
    invoice_number: String,
    amount: Decimal,
}

/// Upsert keyed on the sale, mirroring the unique-index-backed issue
#[derive(Default)]
struct IssuerSim {
    invoices: HashMap<u32, InvoiceRow>,
}

impl IssuerSim {
    fn issue(
        &mut self,
        sale_id: u32,
        sale_total_amount: Decimal,
        invoice_number: &str,
        amount_override: Option<Decimal>,
    ) -> InvoiceRow {
        let row = InvoiceRow {
            invoice_number: invoice_number.to_string(),
            amount: amount_override.unwrap_or(sale_total_amount),
        };
        self.invoices.insert(sale_id, row.clone());
        row
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Amount defaults to the sale total
    #[test]
    fn test_amount_defaults_to_sale_total() {
        let mut issuer = IssuerSim::default();
        let total = sale_total(dec("4"), dec("12.50"));
        let invoice = issuer.issue(1, total, "F-001", None);

        assert_eq!(invoice.amount, dec("50.00"));
    }

    /// An explicit amount overrides the sale total
    #[test]
    fn test_amount_override() {
        let mut issuer = IssuerSim::default();
        let invoice = issuer.issue(1, dec("50.00"), "F-001", Some(dec("45.00")));

        assert_eq!(invoice.amount, dec("45.00"));
    }

    /// Issuing twice for the same sale yields exactly one invoice,
    /// carrying the latest values
    #[test]
    fn test_reissue_updates_in_place() {
        let mut issuer = IssuerSim::default();
        issuer.issue(1, dec("50.00"), "F-001", None);
        issuer.issue(1, dec("50.00"), "F-001-B", Some(dec("48.00")));

        assert_eq!(issuer.invoices.len(), 1);
        let invoice = &issuer.invoices[&1];
        assert_eq!(invoice.invoice_number, "F-001-B");
        assert_eq!(invoice.amount, dec("48.00"));
    }

    /// Invoices for different sales stay independent
    #[test]
    fn test_invoices_are_per_sale() {
        let mut issuer = IssuerSim::default();
        issuer.issue(1, dec("50.00"), "F-001", None);
        issuer.issue(2, dec("30.00"), "F-002", None);

        assert_eq!(issuer.invoices.len(), 2);
        assert_eq!(issuer.invoices[&2].amount, dec("30.00"));
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;

    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..=1_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    proptest! {
        /// However many times issuing runs, one invoice per sale remains and
        /// it reflects the last call
        #[test]
        fn prop_at_most_one_invoice_per_sale(
            totals in prop::collection::vec(amount_strategy(), 1..10)
        ) {
            let mut issuer = IssuerSim::default();
            for (i, total) in totals.iter().enumerate() {
                issuer.issue(7, *total, &format!("F-{:03}", i), None);
            }

            prop_assert_eq!(issuer.invoices.len(), 1);
            prop_assert_eq!(issuer.invoices[&7].amount, *totals.last().unwrap());
        }

        /// The default amount is exactly the stored sale total
        #[test]
        fn prop_default_amount_is_sale_total(
            quantity in (1i64..=5000i64).prop_map(|n| Decimal::new(n, 1)),
            unit_price in amount_strategy()
        ) {
            let total = sale_total(quantity, unit_price);
            let mut issuer = IssuerSim::default();
            let invoice = issuer.issue(1, total, "F-001", None);

            prop_assert_eq!(invoice.amount, total);
        }
    }
}
