use serde::{Deserialize, Serialize};

/// A shop (location) that stock rows point at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shop {
    pub id: i64,
    pub name: String,
}

/// Payload for registering a shop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopCreate {
    pub name: String,
}
