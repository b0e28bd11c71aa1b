//! Stock ledger tests
//!
//! Exercises the deduction planning and the ledger invariants:
//! - quantity never goes negative
//! - initial quantity plus the sum of movements equals the current quantity
//! - oversized outflows clip in lenient mode and refuse in strict mode

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::reconcile::{plan_deduction, DeductionPlan};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// Minimal in-memory ledger mirroring the stock service semantics: every
/// applied change is recorded as one signed movement.
struct LedgerSim {
    initial: Decimal,
    quantity: Decimal,
    movements: Vec<Decimal>,
}

impl LedgerSim {
    fn new(initial: Decimal) -> Self {
        Self {
            initial,
            quantity: initial,
            movements: Vec::new(),
        }
    }

    /// Apply a signed change; outflows go through deduction planning.
    fn apply(&mut self, change: Decimal, strict: bool) -> Result<DeductionPlan, ()> {
        if change < Decimal::ZERO {
            let plan = plan_deduction(self.quantity, -change, strict).map_err(|_| ())?;
            self.quantity = plan.new_quantity;
            self.movements.push(-plan.applied);
            Ok(plan)
        } else {
            self.quantity += change;
            self.movements.push(change);
            Ok(DeductionPlan {
                applied: change,
                new_quantity: self.quantity,
                clipped: false,
            })
        }
    }

    fn movement_sum(&self) -> Decimal {
        self.movements.iter().copied().sum()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Lenient deduction larger than availability clips and drains to zero
    #[test]
    fn test_lenient_clip_drains_stock() {
        let mut ledger = LedgerSim::new(dec("10"));
        let plan = ledger.apply(dec("-12"), false).unwrap();

        assert!(plan.clipped);
        assert_eq!(ledger.quantity, Decimal::ZERO);
        assert_eq!(ledger.movements, vec![dec("-10")]);
    }

    /// Strict deduction larger than availability refuses and changes nothing
    #[test]
    fn test_strict_refusal_leaves_state_unchanged() {
        let mut ledger = LedgerSim::new(dec("10"));
        let result = ledger.apply(dec("-12"), true);

        assert!(result.is_err());
        assert_eq!(ledger.quantity, dec("10"));
        assert!(ledger.movements.is_empty());
    }

    /// A deduction equal to the availability is not a shortfall
    #[test]
    fn test_exact_drain_is_allowed_in_strict_mode() {
        let mut ledger = LedgerSim::new(dec("10"));
        let plan = ledger.apply(dec("-10"), true).unwrap();

        assert!(!plan.clipped);
        assert_eq!(ledger.quantity, Decimal::ZERO);
    }

    /// Clipping against an empty stock records a zero movement
    #[test]
    fn test_clip_on_empty_stock() {
        let mut ledger = LedgerSim::new(Decimal::ZERO);
        let plan = ledger.apply(dec("-5"), false).unwrap();

        assert!(plan.clipped);
        assert_eq!(plan.applied, Decimal::ZERO);
        assert_eq!(ledger.movements, vec![Decimal::ZERO]);
    }

    /// Inflows never clip
    #[test]
    fn test_restore_is_never_clipped() {
        let mut ledger = LedgerSim::new(dec("2"));
        let plan = ledger.apply(dec("7.5"), true).unwrap();

        assert!(!plan.clipped);
        assert_eq!(ledger.quantity, dec("9.5"));
    }

    /// Reconciliation invariant across a mixed sequence
    #[test]
    fn test_reconciliation_invariant() {
        let mut ledger = LedgerSim::new(dec("100"));
        ledger.apply(dec("-30"), false).unwrap();
        ledger.apply(dec("10"), false).unwrap();
        ledger.apply(dec("-90"), false).unwrap(); // clips to -80
        ledger.apply(dec("5"), false).unwrap();

        assert_eq!(ledger.quantity, dec("5"));
        assert_eq!(ledger.initial + ledger.movement_sum(), ledger.quantity);
    }

    /// Exactly one movement per applied change
    #[test]
    fn test_one_movement_per_apply() {
        let mut ledger = LedgerSim::new(dec("50"));
        ledger.apply(dec("-20"), false).unwrap();
        ledger.apply(dec("-40"), false).unwrap();
        ledger.apply(dec("15"), false).unwrap();

        assert_eq!(ledger.movements.len(), 3);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for generating quantities (0.1 to 1000.0)
    fn quantity_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=10000i64).prop_map(|n| Decimal::new(n, 1))
    }

    /// Strategy for signed changes
    fn change_strategy() -> impl Strategy<Value = Decimal> {
        (-10000i64..=10000i64).prop_map(|n| Decimal::new(n, 1))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Quantity is never negative after any sequence of lenient applies
        #[test]
        fn prop_quantity_never_negative(
            initial in quantity_strategy(),
            changes in prop::collection::vec(change_strategy(), 1..30)
        ) {
            let mut ledger = LedgerSim::new(initial);
            for change in changes {
                if change != Decimal::ZERO {
                    let _ = ledger.apply(change, false);
                }
                prop_assert!(ledger.quantity >= Decimal::ZERO);
            }
        }

        /// Initial quantity plus movement sum equals the current quantity
        #[test]
        fn prop_movements_reconcile_to_quantity(
            initial in quantity_strategy(),
            changes in prop::collection::vec(change_strategy(), 1..30)
        ) {
            let mut ledger = LedgerSim::new(initial);
            for change in changes {
                let _ = ledger.apply(change, false);
            }
            prop_assert_eq!(ledger.initial + ledger.movement_sum(), ledger.quantity);
        }

        /// A clipped deduction applies exactly the available quantity
        #[test]
        fn prop_clip_applies_available(
            available in quantity_strategy(),
            excess in quantity_strategy()
        ) {
            let requested = available + excess;
            let plan = plan_deduction(available, requested, false).unwrap();

            prop_assert!(plan.clipped);
            prop_assert_eq!(plan.applied, available);
            prop_assert_eq!(plan.new_quantity, Decimal::ZERO);
        }

        /// Strict mode refuses any request above availability
        #[test]
        fn prop_strict_refuses_excess(
            available in quantity_strategy(),
            excess in quantity_strategy()
        ) {
            let requested = available + excess;
            let result = plan_deduction(available, requested, true);

            prop_assert!(result.is_err());
            let shortfall = result.unwrap_err();
            prop_assert_eq!(shortfall.available, available);
            prop_assert_eq!(shortfall.requested, requested);
        }

        /// Within availability, strict and lenient agree
        #[test]
        fn prop_modes_agree_when_stock_suffices(
            requested in quantity_strategy(),
            headroom in quantity_strategy()
        ) {
            let available = requested + headroom;
            let lenient = plan_deduction(available, requested, false).unwrap();
            let strict = plan_deduction(available, requested, true).unwrap();

            prop_assert_eq!(lenient.applied, strict.applied);
            prop_assert_eq!(lenient.new_quantity, strict.new_quantity);
            prop_assert!(!lenient.clipped);
        }
    }
}
