//! Audit trail rows appended by the store alongside every stock mutation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// The kind of change recorded in the history table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryAction {
    Add,
    Remove,
    Update,
}

impl HistoryAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryAction::Add => "add",
            HistoryAction::Remove => "remove",
            HistoryAction::Update => "update",
        }
    }
}

impl Display for HistoryAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HistoryAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(HistoryAction::Add),
            "remove" => Ok(HistoryAction::Remove),
            "update" => Ok(HistoryAction::Update),
            other => Err(format!("unknown history action: {other}")),
        }
    }
}

/// One recorded change. Quantities are the row state after the change
/// (for deletions, the state of the removed row).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub stock_id: i64,
    pub product_id: i64,
    pub shop_id: i64,
    pub action: HistoryAction,
    pub shelf_quantity: i64,
    pub order_quantity: i64,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_text_round_trips_through_store_representation() {
        for action in [HistoryAction::Add, HistoryAction::Remove, HistoryAction::Update] {
            assert_eq!(action.as_str().parse::<HistoryAction>(), Ok(action));
        }
        assert!("restock".parse::<HistoryAction>().is_err());
    }
}
