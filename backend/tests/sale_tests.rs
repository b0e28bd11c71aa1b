//! Sale reconciliation tests
//!
//! Simulates the reconciler semantics over an in-memory ledger: creation
//! deducts, amendment restores then deducts, deletion keeps history and only
//! restores stock under the opt-in policy.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;

use shared::reconcile::{plan_deduction, sale_total};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reason {
    Sale,
    Restore,
}

#[derive(Debug, Clone, Copy)]
struct Movement {
    stock: u32,
    sale: Option<u32>,
    change: Decimal,
    reason: Reason,
}

#[derive(Debug, Clone, Copy)]
struct SaleRow {
    stock: u32,
    quantity: Decimal,
    total: Decimal,
}

/// In-memory mirror of the reconciliation transaction semantics
#[derive(Default)]
struct ReconcilerSim {
    initial: HashMap<u32, Decimal>,
    stocks: HashMap<u32, Decimal>,
    movements: Vec<Movement>,
    sales: HashMap<u32, SaleRow>,
    next_sale_id: u32,
}

impl ReconcilerSim {
    fn with_stock(stocks: &[(u32, Decimal)]) -> Self {
        let mut sim = Self::default();
        for (id, qty) in stocks {
            sim.initial.insert(*id, *qty);
            sim.stocks.insert(*id, *qty);
        }
        sim
    }

    fn deduct(&mut self, stock: u32, sale: u32, quantity: Decimal, strict: bool) -> Result<bool, ()> {
        let available = self.stocks[&stock];
        let plan = plan_deduction(available, quantity, strict).map_err(|_| ())?;
        self.stocks.insert(stock, plan.new_quantity);
        self.movements.push(Movement {
            stock,
            sale: Some(sale),
            change: -plan.applied,
            reason: Reason::Sale,
        });
        Ok(plan.clipped)
    }

    fn restore(&mut self, stock: u32, sale: u32, quantity: Decimal) {
        let available = self.stocks[&stock];
        self.stocks.insert(stock, available + quantity);
        self.movements.push(Movement {
            stock,
            sale: Some(sale),
            change: quantity,
            reason: Reason::Restore,
        });
    }

    /// Create a sale: persist the row and deduct, atomically. A strict
    /// shortfall leaves no trace.
    fn create_sale(
        &mut self,
        stock: u32,
        quantity: Decimal,
        unit_price: Decimal,
        strict: bool,
    ) -> Result<(u32, bool), ()> {
        let sale_id = self.next_sale_id;
        let clipped = self.deduct(stock, sale_id, quantity, strict)?;
        self.sales.insert(
            sale_id,
            SaleRow {
                stock,
                quantity,
                total: sale_total(quantity, unit_price),
            },
        );
        self.next_sale_id += 1;
        Ok((sale_id, clipped))
    }

    /// Amend a sale: restore the old quantity to the old stock, then deduct
    /// the new quantity from the new stock. Rolls back entirely on a strict
    /// shortfall.
    fn amend_sale(
        &mut self,
        sale_id: u32,
        new_stock: u32,
        new_quantity: Decimal,
        new_unit_price: Decimal,
        strict: bool,
    ) -> Result<bool, ()> {
        let old = self.sales[&sale_id];
        let checkpoint = (self.stocks.clone(), self.movements.len());

        self.restore(old.stock, sale_id, old.quantity);
        match self.deduct(new_stock, sale_id, new_quantity, strict) {
            Ok(clipped) => {
                self.sales.insert(
                    sale_id,
                    SaleRow {
                        stock: new_stock,
                        quantity: new_quantity,
                        total: sale_total(new_quantity, new_unit_price),
                    },
                );
                Ok(clipped)
            }
            Err(()) => {
                self.stocks = checkpoint.0;
                self.movements.truncate(checkpoint.1);
                Err(())
            }
        }
    }

    /// Delete a sale; history stays, stock restores only under the policy.
    fn delete_sale(&mut self, sale_id: u32, restore_on_delete: bool) {
        let sale = self.sales.remove(&sale_id).unwrap();
        if restore_on_delete {
            self.restore(sale.stock, sale_id, sale.quantity);
        }
        for movement in &mut self.movements {
            if movement.sale == Some(sale_id) {
                movement.sale = None;
            }
        }
    }

    fn movement_sum(&self, stock: u32) -> Decimal {
        self.movements
            .iter()
            .filter(|m| m.stock == stock)
            .map(|m| m.change)
            .sum()
    }

    fn reconciles(&self, stock: u32) -> bool {
        self.initial[&stock] + self.movement_sum(stock) == self.stocks[&stock]
    }
}

// ============================================================================
// Scenario Tests
// ============================================================================

#[cfg(test)]
mod scenario_tests {
    use super::*;

    /// Lenient oversell: sale keeps the ordered quantity, ledger records the
    /// clipped deduction, stock drains to zero
    #[test]
    fn test_lenient_oversell_clips() {
        let mut sim = ReconcilerSim::with_stock(&[(1, dec("10"))]);
        let (sale_id, clipped) = sim.create_sale(1, dec("12"), dec("2.00"), false).unwrap();

        assert!(clipped);
        assert_eq!(sim.sales[&sale_id].quantity, dec("12"));
        assert_eq!(sim.stocks[&1], Decimal::ZERO);
        assert_eq!(sim.movements.len(), 1);
        assert_eq!(sim.movements[0].change, dec("-10"));
        assert_eq!(sim.movements[0].reason, Reason::Sale);
        assert!(sim.reconciles(1));
    }

    /// Strict oversell: nothing persists
    #[test]
    fn test_strict_oversell_rejects_everything() {
        let mut sim = ReconcilerSim::with_stock(&[(1, dec("10"))]);
        let result = sim.create_sale(1, dec("12"), dec("2.00"), true);

        assert!(result.is_err());
        assert_eq!(sim.stocks[&1], dec("10"));
        assert!(sim.movements.is_empty());
        assert!(sim.sales.is_empty());
    }

    /// Plain sale within availability
    #[test]
    fn test_create_within_availability() {
        let mut sim = ReconcilerSim::with_stock(&[(1, dec("10"))]);
        let (sale_id, clipped) = sim.create_sale(1, dec("4"), dec("3.50"), true).unwrap();

        assert!(!clipped);
        assert_eq!(sim.stocks[&1], dec("6"));
        assert_eq!(sim.sales[&sale_id].total, dec("14.00"));
        assert!(sim.reconciles(1));
    }

    /// Amendment moving a sale from stock A to stock B restores A first,
    /// then deducts from B
    #[test]
    fn test_amend_across_stocks() {
        let mut sim = ReconcilerSim::with_stock(&[(1, dec("10")), (2, dec("20"))]);
        let (sale_id, _) = sim.create_sale(1, dec("4"), dec("1.00"), true).unwrap();

        sim.amend_sale(sale_id, 2, dec("6"), dec("1.00"), true).unwrap();

        assert_eq!(sim.stocks[&1], dec("10"));
        assert_eq!(sim.stocks[&2], dec("14"));

        let amendment = &sim.movements[1..];
        assert_eq!(amendment.len(), 2);
        assert_eq!(amendment[0].stock, 1);
        assert_eq!(amendment[0].change, dec("4"));
        assert_eq!(amendment[0].reason, Reason::Restore);
        assert_eq!(amendment[1].stock, 2);
        assert_eq!(amendment[1].change, dec("-6"));
        assert_eq!(amendment[1].reason, Reason::Sale);
        assert!(sim.reconciles(1));
        assert!(sim.reconciles(2));
    }

    /// Same-stock amendment nets out to a delta adjustment via a
    /// restore-then-deduct pair
    #[test]
    fn test_amend_same_stock_is_delta() {
        let mut sim = ReconcilerSim::with_stock(&[(1, dec("15"))]);
        let (sale_id, _) = sim.create_sale(1, dec("5"), dec("1.00"), true).unwrap();
        assert_eq!(sim.stocks[&1], dec("10"));

        sim.amend_sale(sale_id, 1, dec("8"), dec("1.00"), true).unwrap();

        // pre-amend 10, restore +5, deduct -8: net decrease of 3
        assert_eq!(sim.stocks[&1], dec("7"));
        let amendment = &sim.movements[1..];
        assert_eq!(amendment[0].change, dec("5"));
        assert_eq!(amendment[0].reason, Reason::Restore);
        assert_eq!(amendment[1].change, dec("-8"));
        assert_eq!(amendment[1].reason, Reason::Sale);
        assert!(sim.reconciles(1));
    }

    /// The restore phase makes room: raising the quantity to more than the
    /// remaining stock succeeds when the replenished quantity covers it
    #[test]
    fn test_amend_can_use_replenished_quantity() {
        let mut sim = ReconcilerSim::with_stock(&[(1, dec("10"))]);
        let (sale_id, _) = sim.create_sale(1, dec("8"), dec("1.00"), true).unwrap();
        assert_eq!(sim.stocks[&1], dec("2"));

        // 2 available, but restore brings it to 10, so 9 fits strictly
        sim.amend_sale(sale_id, 1, dec("9"), dec("1.00"), true).unwrap();
        assert_eq!(sim.stocks[&1], dec("1"));
        assert!(sim.reconciles(1));
    }

    /// A strict shortfall on amendment rolls the restoration back too
    #[test]
    fn test_amend_strict_shortfall_rolls_back() {
        let mut sim = ReconcilerSim::with_stock(&[(1, dec("10"))]);
        let (sale_id, _) = sim.create_sale(1, dec("4"), dec("1.00"), true).unwrap();
        let movements_before = sim.movements.len();

        let result = sim.amend_sale(sale_id, 1, dec("25"), dec("1.00"), true);

        assert!(result.is_err());
        assert_eq!(sim.stocks[&1], dec("6"));
        assert_eq!(sim.movements.len(), movements_before);
        assert_eq!(sim.sales[&sale_id].quantity, dec("4"));
    }

    /// Deletion keeps the ledger and does not restore stock by default
    #[test]
    fn test_delete_is_non_restoring_by_default() {
        let mut sim = ReconcilerSim::with_stock(&[(1, dec("10"))]);
        let (sale_id, _) = sim.create_sale(1, dec("4"), dec("1.00"), true).unwrap();

        sim.delete_sale(sale_id, false);

        assert_eq!(sim.stocks[&1], dec("6"));
        assert_eq!(sim.movements.len(), 1);
        assert_eq!(sim.movements[0].sale, None);
        assert!(sim.reconciles(1));
    }

    /// Deletion restores stock when the policy is enabled
    #[test]
    fn test_delete_restores_under_policy() {
        let mut sim = ReconcilerSim::with_stock(&[(1, dec("10"))]);
        let (sale_id, _) = sim.create_sale(1, dec("4"), dec("1.00"), true).unwrap();

        sim.delete_sale(sale_id, true);

        assert_eq!(sim.stocks[&1], dec("10"));
        assert_eq!(sim.movements.len(), 2);
        assert_eq!(sim.movements[1].change, dec("4"));
        assert_eq!(sim.movements[1].reason, Reason::Restore);
        assert!(sim.reconciles(1));
    }

    /// Totals are fixed at two decimal places at write time
    #[test]
    fn test_sale_total_rounding() {
        assert_eq!(sale_total(dec("3"), dec("2.50")), dec("7.50"));
        assert_eq!(sale_total(dec("0.333"), dec("10.00")), dec("3.33"));
        assert_eq!(sale_total(dec("12"), dec("0")), dec("0.00"));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn quantity_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=5000i64).prop_map(|n| Decimal::new(n, 1))
    }

    #[derive(Debug, Clone)]
    enum Op {
        Create { quantity: Decimal, strict: bool },
        Amend { quantity: Decimal, strict: bool },
        Delete { restore: bool },
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (quantity_strategy(), any::<bool>())
                .prop_map(|(quantity, strict)| Op::Create { quantity, strict }),
            (quantity_strategy(), any::<bool>())
                .prop_map(|(quantity, strict)| Op::Amend { quantity, strict }),
            any::<bool>().prop_map(|restore| Op::Delete { restore }),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Any sequence of creates, amends and deletes keeps the stock
        /// non-negative and reconciled against its movement ledger
        #[test]
        fn prop_lifecycle_preserves_invariants(
            initial in quantity_strategy(),
            ops in prop::collection::vec(op_strategy(), 1..25)
        ) {
            let mut sim = ReconcilerSim::with_stock(&[(1, initial)]);
            let mut live_sales: Vec<u32> = Vec::new();

            for op in ops {
                match op {
                    Op::Create { quantity, strict } => {
                        if let Ok((sale_id, _)) = sim.create_sale(1, quantity, dec("1.00"), strict) {
                            live_sales.push(sale_id);
                        }
                    }
                    Op::Amend { quantity, strict } => {
                        if let Some(&sale_id) = live_sales.last() {
                            let _ = sim.amend_sale(sale_id, 1, quantity, dec("1.00"), strict);
                        }
                    }
                    Op::Delete { restore } => {
                        if let Some(sale_id) = live_sales.pop() {
                            sim.delete_sale(sale_id, restore);
                        }
                    }
                }

                prop_assert!(sim.stocks[&1] >= Decimal::ZERO);
                prop_assert!(sim.reconciles(1));
            }
        }

        /// A persisted sale always has at least one ledger movement
        #[test]
        fn prop_sale_implies_movement(
            initial in quantity_strategy(),
            quantity in quantity_strategy(),
            strict in any::<bool>()
        ) {
            let mut sim = ReconcilerSim::with_stock(&[(1, initial)]);
            if let Ok((sale_id, _)) = sim.create_sale(1, quantity, dec("1.00"), strict) {
                let count = sim
                    .movements
                    .iter()
                    .filter(|m| m.sale == Some(sale_id))
                    .count();
                prop_assert_eq!(count, 1);
            } else {
                prop_assert!(sim.movements.is_empty());
            }
        }
    }
}
