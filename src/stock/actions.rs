//! Relative quantity adjustments.
//!
//! An adjustment is always executed by the store as a single statement keyed by id. The
//! in-memory store calls [`StockAdjustment::apply`] inside its message loop; the Postgres
//! store expresses the same arithmetic in one `UPDATE`.

use crate::model::{HistoryAction, Stock, StockDelta};

/// Direction of a relative adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Adds `COALESCE(delta, 0)` to each counter.
    Increase,
    /// Subtracts `COALESCE(delta, 0)` from each counter, clamping at zero.
    Decrease,
}

/// A relative change to both counters of one stock row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockAdjustment {
    pub direction: Direction,
    pub delta: StockDelta,
}

/// The adjusted counter no longer fits the store's integer column.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{column} out of range")]
pub struct QuantityOverflow {
    pub column: &'static str,
}

impl StockAdjustment {
    pub fn increase(delta: StockDelta) -> Self {
        Self {
            direction: Direction::Increase,
            delta,
        }
    }

    pub fn decrease(delta: StockDelta) -> Self {
        Self {
            direction: Direction::Decrease,
            delta,
        }
    }

    /// Computes the row after the adjustment. Both counters are always rewritten, an absent
    /// delta counts as zero.
    pub fn apply(&self, stock: &Stock) -> Result<Stock, QuantityOverflow> {
        let shelf = self.adjust(
            "shelf_quantity",
            stock.shelf_quantity,
            self.delta.shelf_quantity,
        )?;
        let order = self.adjust(
            "order_quantity",
            stock.order_quantity,
            self.delta.order_quantity,
        )?;
        Ok(Stock {
            shelf_quantity: shelf,
            order_quantity: order,
            ..stock.clone()
        })
    }

    /// History action recorded alongside this adjustment.
    pub fn history_action(&self) -> HistoryAction {
        match self.direction {
            Direction::Increase => HistoryAction::Add,
            Direction::Decrease => HistoryAction::Remove,
        }
    }

    fn adjust(
        &self,
        column: &'static str,
        current: i64,
        delta: Option<i64>,
    ) -> Result<i64, QuantityOverflow> {
        let delta = delta.unwrap_or(0);
        match self.direction {
            Direction::Increase => current
                .checked_add(delta)
                .ok_or(QuantityOverflow { column }),
            Direction::Decrease => Ok(current.saturating_sub(delta).max(0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stock(shelf: i64, order: i64) -> Stock {
        Stock {
            id: 1,
            product_id: 1,
            shelf_quantity: shelf,
            order_quantity: order,
            shop_id: 1,
        }
    }

    fn delta(shelf: Option<i64>, order: Option<i64>) -> StockDelta {
        StockDelta {
            shelf_quantity: shelf,
            order_quantity: order,
        }
    }

    #[test]
    fn increase_adds_and_defaults_missing_delta_to_zero() {
        let after = StockAdjustment::increase(delta(Some(5), None))
            .apply(&stock(10, 2))
            .unwrap();
        assert_eq!(after.shelf_quantity, 15);
        assert_eq!(after.order_quantity, 2);
    }

    #[test]
    fn decrease_clamps_at_zero() {
        let after = StockAdjustment::decrease(delta(None, Some(10)))
            .apply(&stock(15, 2))
            .unwrap();
        assert_eq!(after.shelf_quantity, 15);
        assert_eq!(after.order_quantity, 0);
    }

    #[test]
    fn decrease_at_floor_stays_at_floor() {
        let adjustment = StockAdjustment::decrease(delta(Some(i64::MAX), Some(1)));
        let after = adjustment.apply(&stock(0, 0)).unwrap();
        assert_eq!((after.shelf_quantity, after.order_quantity), (0, 0));
    }

    #[test]
    fn increase_then_decrease_restores_original() {
        let original = stock(7, 3);
        let change = delta(Some(4), Some(9));
        let up = StockAdjustment::increase(change).apply(&original).unwrap();
        let down = StockAdjustment::decrease(change).apply(&up).unwrap();
        assert_eq!(down, original);
    }

    #[test]
    fn increase_past_integer_range_fails() {
        let err = StockAdjustment::increase(delta(Some(1), None))
            .apply(&stock(i64::MAX, 0))
            .unwrap_err();
        assert_eq!(err.column, "shelf_quantity");
    }

    #[test]
    fn history_actions_follow_direction() {
        assert_eq!(
            StockAdjustment::increase(StockDelta::default()).history_action(),
            HistoryAction::Add
        );
        assert_eq!(
            StockAdjustment::decrease(StockDelta::default()).history_action(),
            HistoryAction::Remove
        );
    }
}
