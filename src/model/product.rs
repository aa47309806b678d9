use serde::{Deserialize, Serialize};

/// A catalog entry. `plu` is unique across the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub plu: String,
    pub name: String,
}

impl Product {
    /// Creates a new Product instance.
    ///
    /// # Arguments
    /// * `id` - Unique identifier (assigned by the store)
    /// * `plu` - Price look-up code
    /// * `name` - Display name
    pub fn new(id: i64, plu: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            plu: plu.into(),
            name: name.into(),
        }
    }
}

/// Payload for creating a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCreate {
    pub plu: String,
    pub name: String,
}

/// Catalog search: case-insensitive `name` substring and exact `plu`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub name: Option<String>,
    pub plu: Option<String>,
}
