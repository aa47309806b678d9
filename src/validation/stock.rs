//! Schemas for stock identifiers, payloads and filters.

use super::{
    integer, object, optional_integer, optional_string, query_object, reject_unknown,
    required_integer, IntegerRule, ValidationError,
};
use crate::model::{StockCreate, StockDelta, StockFilter};
use serde_json::Value;
use std::collections::HashMap;

const STOCK_FIELDS: &[&str] = &["product_id", "shelf_quantity", "order_quantity", "shop_id"];
const DELTA_FIELDS: &[&str] = &["shelf_quantity", "order_quantity"];
const FILTER_FIELDS: &[&str] = &[
    "plu",
    "shop_id",
    "shelf_min",
    "shelf_max",
    "order_min",
    "order_max",
];

/// Parses a path identifier (`id`, `product_id`, `shop_id`, `order_id`): positive integers only.
pub fn parse_id(field: &str, raw: &str) -> Result<i64, ValidationError> {
    integer(field, &Value::String(raw.to_string()), IntegerRule::Positive)
}

impl StockCreate {
    /// Validates a create/replace body. All four fields are required.
    pub fn from_body(body: &Value) -> Result<Self, ValidationError> {
        let fields = object(body)?;
        let params = Self {
            product_id: required_integer(fields, "product_id", IntegerRule::Positive)?,
            shelf_quantity: required_integer(fields, "shelf_quantity", IntegerRule::NonNegative)?,
            order_quantity: required_integer(fields, "order_quantity", IntegerRule::NonNegative)?,
            shop_id: required_integer(fields, "shop_id", IntegerRule::Positive)?,
        };
        reject_unknown(fields, STOCK_FIELDS)?;
        Ok(params)
    }
}

impl StockDelta {
    /// Validates an increase/decrease body. Both fields are optional.
    pub fn from_body(body: &Value) -> Result<Self, ValidationError> {
        let fields = object(body)?;
        let delta = Self {
            shelf_quantity: optional_integer(fields, "shelf_quantity", IntegerRule::NonNegative)?,
            order_quantity: optional_integer(fields, "order_quantity", IntegerRule::NonNegative)?,
        };
        reject_unknown(fields, DELTA_FIELDS)?;
        Ok(delta)
    }
}

impl StockFilter {
    /// Validates filter query parameters. Every field is optional; unknown keys are rejected.
    pub fn from_query(query: &HashMap<String, String>) -> Result<Self, ValidationError> {
        let fields = query_object(query);
        let filter = Self {
            plu: optional_string(&fields, "plu")?,
            shop_id: optional_integer(&fields, "shop_id", IntegerRule::Positive)?,
            shelf_min: optional_integer(&fields, "shelf_min", IntegerRule::NonNegative)?,
            shelf_max: optional_integer(&fields, "shelf_max", IntegerRule::NonNegative)?,
            order_min: optional_integer(&fields, "order_min", IntegerRule::NonNegative)?,
            order_max: optional_integer(&fields, "order_max", IntegerRule::NonNegative)?,
        };
        reject_unknown(&fields, FILTER_FIELDS)?;
        Ok(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn ids_must_be_positive_integers() {
        assert_eq!(parse_id("id", "42"), Ok(42));
        assert_eq!(
            parse_id("id", "0").unwrap_err().message,
            "\"id\" must be a positive number"
        );
        assert_eq!(
            parse_id("id", "-3").unwrap_err().message,
            "\"id\" must be a positive number"
        );
        assert_eq!(
            parse_id("id", "abc").unwrap_err().message,
            "\"id\" must be a number"
        );
        assert_eq!(
            parse_id("id", "2.5").unwrap_err().message,
            "\"id\" must be an integer"
        );
    }

    #[test]
    fn create_payload_requires_every_field() {
        let params = StockCreate::from_body(&json!({
            "product_id": 1,
            "shelf_quantity": 10,
            "order_quantity": 2,
            "shop_id": 1,
        }))
        .unwrap();
        assert_eq!(
            params,
            StockCreate {
                product_id: 1,
                shelf_quantity: 10,
                order_quantity: 2,
                shop_id: 1,
            }
        );

        let err = StockCreate::from_body(&json!({
            "product_id": 1,
            "shelf_quantity": 10,
            "shop_id": 1,
        }))
        .unwrap_err();
        assert_eq!(err.field, "order_quantity");
        assert_eq!(err.message, "\"order_quantity\" is required");
    }

    #[test]
    fn create_payload_checks_ranges_in_schema_order() {
        let err = StockCreate::from_body(&json!({
            "product_id": 0,
            "shelf_quantity": -1,
            "order_quantity": 2,
            "shop_id": 1,
        }))
        .unwrap_err();
        assert_eq!(err.field, "product_id");

        let err = StockCreate::from_body(&json!({
            "product_id": 1,
            "shelf_quantity": -1,
            "order_quantity": 2,
            "shop_id": 1,
        }))
        .unwrap_err();
        assert_eq!(err.message, "\"shelf_quantity\" must be greater than or equal to 0");
    }

    #[test]
    fn create_payload_is_strict() {
        let err = StockCreate::from_body(&json!({
            "product_id": 1,
            "shelf_quantity": 1,
            "order_quantity": 2,
            "shop_id": 1,
            "id": 9,
        }))
        .unwrap_err();
        assert_eq!(err.message, "\"id\" is not allowed");
    }

    #[test]
    fn delta_fields_are_optional_and_absence_is_not_zero() {
        let delta = StockDelta::from_body(&json!({"shelf_quantity": 5})).unwrap();
        assert_eq!(delta.shelf_quantity, Some(5));
        assert_eq!(delta.order_quantity, None);

        let empty = StockDelta::from_body(&json!({})).unwrap();
        assert_eq!(empty, StockDelta::default());

        let err = StockDelta::from_body(&json!({"order_quantity": -2})).unwrap_err();
        assert_eq!(err.field, "order_quantity");

        let err = StockDelta::from_body(&json!({"shop_id": 2})).unwrap_err();
        assert_eq!(err.message, "\"shop_id\" is not allowed");
    }

    #[test]
    fn filter_parses_query_strings() {
        let filter = StockFilter::from_query(&query(&[
            ("plu", "A-100"),
            ("shop_id", "3"),
            ("shelf_min", "5"),
            ("order_max", "0"),
        ]))
        .unwrap();
        assert_eq!(
            filter,
            StockFilter {
                plu: Some("A-100".to_string()),
                shop_id: Some(3),
                shelf_min: Some(5),
                shelf_max: None,
                order_min: None,
                order_max: Some(0),
            }
        );

        assert_eq!(
            StockFilter::from_query(&HashMap::new()).unwrap(),
            StockFilter::default()
        );
    }

    #[test]
    fn filter_rejects_bad_and_unknown_fields() {
        let err = StockFilter::from_query(&query(&[("shop_id", "0")])).unwrap_err();
        assert_eq!(err.message, "\"shop_id\" must be a positive number");

        let err = StockFilter::from_query(&query(&[("shelf_min", "many")])).unwrap_err();
        assert_eq!(err.message, "\"shelf_min\" must be a number");

        let err = StockFilter::from_query(&query(&[("page", "2")])).unwrap_err();
        assert_eq!(err.message, "\"page\" is not allowed");
    }
}
