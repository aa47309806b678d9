use serde::{Deserialize, Serialize};

/// One inventory record tying a product to a shop with two quantity counters.
///
/// # Storage
/// Rows are owned by the [`StorageGateway`](crate::store::StorageGateway); nothing in this crate
/// caches them. `(product_id, shop_id)` is not unique, several rows may share a pairing.
///
/// See [`StockClient`](crate::clients::StockClient) for the operations that produce and mutate rows:
/// - Creation and full replacement ([`StockCreate`])
/// - Relative adjustments ([`StockDelta`], [`StockAdjustment`](crate::stock::StockAdjustment))
/// - Filtering ([`StockFilter`], [`StockListing`])
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub id: i64,
    pub product_id: i64,
    pub shelf_quantity: i64,
    pub order_quantity: i64,
    pub shop_id: i64,
}

impl Stock {
    /// Builds a row from a validated payload and a store-assigned id.
    pub fn from_params(id: i64, params: &StockCreate) -> Self {
        Self {
            id,
            product_id: params.product_id,
            shelf_quantity: params.shelf_quantity,
            order_quantity: params.order_quantity,
            shop_id: params.shop_id,
        }
    }
}

/// Payload for creating a stock row, also used for full replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockCreate {
    pub product_id: i64,
    pub shelf_quantity: i64,
    pub order_quantity: i64,
    pub shop_id: i64,
}

/// Partial quantities for increase/decrease. `None` leaves the counter untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockDelta {
    pub shelf_quantity: Option<i64>,
    pub order_quantity: Option<i64>,
}

/// Optional filter fields; every absent field matches all rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockFilter {
    pub plu: Option<String>,
    pub shop_id: Option<i64>,
    pub shelf_min: Option<i64>,
    pub shelf_max: Option<i64>,
    pub order_min: Option<i64>,
    pub order_max: Option<i64>,
}

/// A stock row joined with the `plu` and `name` of its product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockListing {
    #[serde(flatten)]
    pub stock: Stock,
    pub plu: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_serializes_flat() {
        let listing = StockListing {
            stock: Stock {
                id: 3,
                product_id: 1,
                shelf_quantity: 10,
                order_quantity: 2,
                shop_id: 1,
            },
            plu: "PLU-001".to_string(),
            name: "Milk".to_string(),
        };

        let value = serde_json::to_value(&listing).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": 3,
                "product_id": 1,
                "shelf_quantity": 10,
                "order_quantity": 2,
                "shop_id": 1,
                "plu": "PLU-001",
                "name": "Milk",
            })
        );
    }
}
