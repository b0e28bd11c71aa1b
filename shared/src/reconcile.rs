//! Stock reconciliation arithmetic
//!
//! The decision of how a requested outflow maps onto an available quantity is
//! kept free of persistence concerns so the invariants can be tested in
//! isolation. The ledger service applies the resulting plan inside its own
//! transaction.

use rust_decimal::Decimal;
use thiserror::Error;

/// Outcome of planning a quantity deduction against a stock record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeductionPlan {
    /// The quantity actually taken from stock. Less than the requested
    /// quantity when the outflow was clipped.
    pub applied: Decimal,
    /// Quantity remaining after the deduction. Never negative.
    pub new_quantity: Decimal,
    /// True when the request exceeded availability and was reduced.
    pub clipped: bool,
}

/// A strict deduction asked for more than the stock holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("requested {requested} exceeds available {available}")]
pub struct Shortfall {
    pub requested: Decimal,
    pub available: Decimal,
}

/// Plan the removal of `requested` units from a stock holding `available`.
///
/// In lenient mode an oversized request is clipped to the available quantity
/// and the stock drains to zero; callers surface this to the user as a
/// partial fulfilment. In strict mode the same situation is a [`Shortfall`]
/// and nothing may change.
pub fn plan_deduction(
    available: Decimal,
    requested: Decimal,
    strict: bool,
) -> Result<DeductionPlan, Shortfall> {
    if requested > available {
        if strict {
            return Err(Shortfall {
                requested,
                available,
            });
        }
        return Ok(DeductionPlan {
            applied: available,
            new_quantity: Decimal::ZERO,
            clipped: true,
        });
    }
    Ok(DeductionPlan {
        applied: requested,
        new_quantity: available - requested,
        clipped: false,
    })
}

/// Total amount of a sale, fixed at two decimal places at write time so
/// historical totals survive later price changes.
pub fn sale_total(quantity: Decimal, unit_price: Decimal) -> Decimal {
    (quantity * unit_price).round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn deduction_within_availability() {
        let plan = plan_deduction(dec("10"), dec("4"), false).unwrap();
        assert_eq!(plan.applied, dec("4"));
        assert_eq!(plan.new_quantity, dec("6"));
        assert!(!plan.clipped);
    }

    #[test]
    fn lenient_deduction_clips_to_available() {
        let plan = plan_deduction(dec("10"), dec("12"), false).unwrap();
        assert_eq!(plan.applied, dec("10"));
        assert_eq!(plan.new_quantity, Decimal::ZERO);
        assert!(plan.clipped);
    }

    #[test]
    fn strict_deduction_refuses_shortfall() {
        let err = plan_deduction(dec("10"), dec("12"), true).unwrap_err();
        assert_eq!(err.requested, dec("12"));
        assert_eq!(err.available, dec("10"));
    }

    #[test]
    fn strict_deduction_allows_exact_drain() {
        let plan = plan_deduction(dec("10"), dec("10"), true).unwrap();
        assert_eq!(plan.applied, dec("10"));
        assert_eq!(plan.new_quantity, Decimal::ZERO);
        assert!(!plan.clipped);
    }

    #[test]
    fn deduction_from_empty_stock() {
        let plan = plan_deduction(Decimal::ZERO, dec("5"), false).unwrap();
        assert_eq!(plan.applied, Decimal::ZERO);
        assert_eq!(plan.new_quantity, Decimal::ZERO);
        assert!(plan.clipped);
    }

    #[test]
    fn sale_total_rounds_to_two_places() {
        assert_eq!(sale_total(dec("3"), dec("2.50")), dec("7.50"));
        assert_eq!(sale_total(dec("0.333"), dec("10.00")), dec("3.33"));
    }
}
