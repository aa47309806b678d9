//! Schemas for the product catalog and shop registration.

use super::{
    object, optional_string, query_object, reject_unknown, required_string, ValidationError,
};
use crate::model::{ProductCreate, ProductFilter, ShopCreate};
use serde_json::Value;
use std::collections::HashMap;

impl ProductCreate {
    pub fn from_body(body: &Value) -> Result<Self, ValidationError> {
        let fields = object(body)?;
        let params = Self {
            plu: required_string(fields, "plu")?,
            name: required_string(fields, "name")?,
        };
        reject_unknown(fields, &["plu", "name"])?;
        Ok(params)
    }
}

impl ProductFilter {
    pub fn from_query(query: &HashMap<String, String>) -> Result<Self, ValidationError> {
        let fields = query_object(query);
        let filter = Self {
            name: optional_string(&fields, "name")?,
            plu: optional_string(&fields, "plu")?,
        };
        reject_unknown(&fields, &["name", "plu"])?;
        Ok(filter)
    }
}

impl ShopCreate {
    pub fn from_body(body: &Value) -> Result<Self, ValidationError> {
        let fields = object(body)?;
        let params = Self {
            name: required_string(fields, "name")?,
        };
        reject_unknown(fields, &["name"])?;
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn product_requires_plu_and_name() {
        let params = ProductCreate::from_body(&json!({"plu": "P-1", "name": "Bread"})).unwrap();
        assert_eq!(params.plu, "P-1");
        assert_eq!(params.name, "Bread");

        let err = ProductCreate::from_body(&json!({"name": "Bread"})).unwrap_err();
        assert_eq!(err.message, "\"plu\" is required");
    }

    #[test]
    fn product_filter_is_optional_and_strict() {
        let filter = ProductFilter::from_query(&HashMap::from([(
            "name".to_string(),
            "bre".to_string(),
        )]))
        .unwrap();
        assert_eq!(filter.name.as_deref(), Some("bre"));
        assert_eq!(filter.plu, None);

        let err = ProductFilter::from_query(&HashMap::from([(
            "price".to_string(),
            "1".to_string(),
        )]))
        .unwrap_err();
        assert_eq!(err.field, "price");
    }

    #[test]
    fn shop_requires_name() {
        assert!(ShopCreate::from_body(&json!({"name": "Downtown"})).is_ok());
        assert_eq!(
            ShopCreate::from_body(&json!({})).unwrap_err().message,
            "\"name\" is required"
        );
    }
}
