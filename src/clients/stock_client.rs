use crate::clients::gateway_client::GatewayClient;
use crate::model::{HistoryEntry, Stock, StockCreate, StockDelta, StockFilter, StockListing};
use crate::query::Predicate;
use crate::stock::{StockAdjustment, StockError, StockOperation};
use crate::store::{StorageGateway, StoreError};
use crate::validation::parse_id;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Client for stock operations.
///
/// Every method validates its raw input first and returns [`StockError::Validation`] without
/// touching the store when that fails. Otherwise it issues exactly one gateway statement.
/// Path ids arrive as text, bodies as JSON and filters as query-string maps.
#[derive(Clone)]
pub struct StockClient {
    gateway: Arc<dyn StorageGateway>,
}

impl GatewayClient for StockClient {
    type Error = StockError;
    type Operation = StockOperation;

    fn gateway(&self) -> &Arc<dyn StorageGateway> {
        &self.gateway
    }

    fn map_error(operation: StockOperation, err: StoreError) -> StockError {
        StockError::from_store(operation, err)
    }
}

impl StockClient {
    pub fn new(gateway: Arc<dyn StorageGateway>) -> Self {
        Self { gateway }
    }

    #[instrument(skip(self, body))]
    pub async fn create(&self, body: &Value) -> Result<Stock, StockError> {
        debug!(?body, "create called");
        let params = StockCreate::from_body(body)?;
        let stock = self
            .gateway()
            .insert_stock(params)
            .await
            .map_err(|e| Self::store_failure(StockOperation::Create, e))?;
        info!(stock_id = stock.id, "Stock record created");
        Ok(stock)
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Stock>, StockError> {
        debug!("Sending request");
        self.gateway()
            .select_stocks()
            .await
            .map_err(|e| Self::store_failure(StockOperation::List, e))
    }

    /// Looks a row up by its **product** id. The first row for that product (lowest row id)
    /// is returned.
    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<Stock, StockError> {
        let product_id = parse_id("id", id)?;
        debug!("Sending request");
        self.gateway()
            .select_stock_by_product(product_id)
            .await
            .map_err(|e| Self::store_failure(StockOperation::Get, e))?
            .ok_or(StockError::NotFound)
    }

    /// Overwrites all four fields of the row with primary key `id`.
    #[instrument(skip(self, body))]
    pub async fn replace(&self, id: &str, body: &Value) -> Result<Stock, StockError> {
        let id = parse_id("id", id)?;
        let params = StockCreate::from_body(body)?;
        debug!(?params, "Sending request");
        self.gateway()
            .replace_stock(id, params)
            .await
            .map_err(|e| Self::store_failure(StockOperation::Replace, e))?
            .ok_or(StockError::NotFound)
    }

    /// Removes the row and returns its last state.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<Stock, StockError> {
        let id = parse_id("id", id)?;
        debug!("Sending request");
        self.gateway()
            .delete_stock(id)
            .await
            .map_err(|e| Self::store_failure(StockOperation::Delete, e))?
            .ok_or(StockError::NotFound)
    }

    #[instrument(skip(self, body))]
    pub async fn increase(&self, id: &str, body: &Value) -> Result<Stock, StockError> {
        let id = parse_id("id", id)?;
        let delta = StockDelta::from_body(body)?;
        self.adjust(id, StockAdjustment::increase(delta), StockOperation::Increase)
            .await
    }

    /// Counters never drop below zero; larger decrements are clamped silently.
    #[instrument(skip(self, body))]
    pub async fn decrease(&self, id: &str, body: &Value) -> Result<Stock, StockError> {
        let id = parse_id("id", id)?;
        let delta = StockDelta::from_body(body)?;
        self.adjust(id, StockAdjustment::decrease(delta), StockOperation::Decrease)
            .await
    }

    async fn adjust(
        &self,
        id: i64,
        adjustment: StockAdjustment,
        operation: StockOperation,
    ) -> Result<Stock, StockError> {
        debug!(?adjustment, "Sending request");
        self.gateway()
            .adjust_stock(id, adjustment)
            .await
            .map_err(|e| Self::store_failure(operation, e))?
            .ok_or(StockError::NotFound)
    }

    #[instrument(skip(self, query))]
    pub async fn filter(
        &self,
        query: &HashMap<String, String>,
    ) -> Result<Vec<StockListing>, StockError> {
        let filter = StockFilter::from_query(query)?;
        let predicate = Predicate::for_stocks(&filter);
        debug!(?predicate, "Sending request");
        self.gateway()
            .filter_stocks(&predicate)
            .await
            .map_err(|e| Self::store_failure(StockOperation::Filter, e))
    }

    #[instrument(skip(self))]
    pub async fn history(&self) -> Result<Vec<HistoryEntry>, StockError> {
        debug!("Sending request");
        self.gateway()
            .select_history()
            .await
            .map_err(|e| Self::store_failure(StockOperation::History, e))
    }
}
