use crate::catalog::{CatalogError, CatalogOperation};
use crate::clients::gateway_client::GatewayClient;
use crate::model::{Product, ProductCreate, ProductFilter, Shop, ShopCreate};
use crate::query::Predicate;
use crate::store::{StorageGateway, StoreError};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Client for the product catalog and shop registration.
#[derive(Clone)]
pub struct CatalogClient {
    gateway: Arc<dyn StorageGateway>,
}

impl GatewayClient for CatalogClient {
    type Error = CatalogError;
    type Operation = CatalogOperation;

    fn gateway(&self) -> &Arc<dyn StorageGateway> {
        &self.gateway
    }

    fn map_error(operation: CatalogOperation, err: StoreError) -> CatalogError {
        CatalogError::from_store(operation, err)
    }
}

impl CatalogClient {
    pub fn new(gateway: Arc<dyn StorageGateway>) -> Self {
        Self { gateway }
    }

    #[instrument(skip(self, body))]
    pub async fn create_product(&self, body: &Value) -> Result<Product, CatalogError> {
        debug!(?body, "create_product called");
        let params = ProductCreate::from_body(body)?;
        let product = self
            .gateway()
            .insert_product(params)
            .await
            .map_err(|e| Self::store_failure(CatalogOperation::CreateProduct, e))?;
        info!(product_id = product.id, plu = %product.plu, "Product created");
        Ok(product)
    }

    #[instrument(skip(self, query))]
    pub async fn filter_products(
        &self,
        query: &HashMap<String, String>,
    ) -> Result<Vec<Product>, CatalogError> {
        let filter = ProductFilter::from_query(query)?;
        let predicate = Predicate::for_products(&filter);
        debug!(?predicate, "Sending request");
        self.gateway()
            .filter_products(&predicate)
            .await
            .map_err(|e| Self::store_failure(CatalogOperation::FilterProducts, e))
    }

    #[instrument(skip(self, body))]
    pub async fn create_shop(&self, body: &Value) -> Result<Shop, CatalogError> {
        let params = ShopCreate::from_body(body)?;
        debug!(?params, "Sending request");
        self.gateway()
            .insert_shop(params)
            .await
            .map_err(|e| Self::store_failure(CatalogOperation::CreateShop, e))
    }
}
