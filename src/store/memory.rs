//! # In-Memory Store
//!
//! A store actor that owns every table and processes one statement per message.
//!
//! The actor is the "server" half: it owns the receiver and every table. Because messages
//! are handled strictly one at a time, every statement (including a relative adjustment and
//! its history append) is atomic without any lock. [`InMemoryGateway`] is the "client" half and
//! implements [`StorageGateway`] by sending a message and awaiting the one-shot reply.
//!
//! Constraints mirror the relational schema: `products.plu` is unique, and stock rows must
//! reference an existing product and shop.

use super::message::{Response, StoreRequest};
use super::{StorageGateway, StoreError};
use crate::model::{
    HistoryAction, HistoryEntry, Product, ProductCreate, Shop, ShopCreate, Stock, StockCreate,
    StockListing,
};
use crate::query::Predicate;
use crate::stock::StockAdjustment;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

const FOREIGN_KEY_MESSAGE: &str =
    "insert or update on table \"stocks\" violates foreign key constraint";
const UNIQUE_PLU_MESSAGE: &str =
    "duplicate key value violates unique constraint \"products_plu_key\"";

/// Id sequences. Like `BIGSERIAL`, the first id handed out is 1.
#[derive(Debug, Default)]
struct Sequences {
    product: i64,
    shop: i64,
    stock: i64,
    history: i64,
}

fn next_id(sequence: &mut i64) -> i64 {
    *sequence += 1;
    *sequence
}

/// Rows keyed by id. `BTreeMap` keeps every listing in id order.
#[derive(Debug, Default)]
struct Tables {
    products: BTreeMap<i64, Product>,
    shops: BTreeMap<i64, Shop>,
    stocks: BTreeMap<i64, Stock>,
    history: Vec<HistoryEntry>,
    sequences: Sequences,
}

impl Tables {
    fn insert_product(&mut self, params: ProductCreate) -> Result<Product, StoreError> {
        if self.products.values().any(|p| p.plu == params.plu) {
            warn!(plu = %params.plu, "Unique violation");
            return Err(StoreError::unique(UNIQUE_PLU_MESSAGE));
        }
        let id = next_id(&mut self.sequences.product);
        let product = Product::new(id, params.plu, params.name);
        self.products.insert(id, product.clone());
        info!(product_id = id, size = self.products.len(), "Product created");
        Ok(product)
    }

    fn filter_products(&self, predicate: &Predicate) -> Vec<Product> {
        self.products
            .values()
            .filter(|product| predicate.matches(*product))
            .cloned()
            .collect()
    }

    fn insert_shop(&mut self, params: ShopCreate) -> Shop {
        let id = next_id(&mut self.sequences.shop);
        let shop = Shop {
            id,
            name: params.name,
        };
        self.shops.insert(id, shop.clone());
        info!(shop_id = id, size = self.shops.len(), "Shop created");
        shop
    }

    fn check_references(&self, params: &StockCreate) -> Result<(), StoreError> {
        if self.products.contains_key(&params.product_id) && self.shops.contains_key(&params.shop_id)
        {
            return Ok(());
        }
        warn!(
            product_id = params.product_id,
            shop_id = params.shop_id,
            "Foreign key violation"
        );
        Err(StoreError::foreign_key(FOREIGN_KEY_MESSAGE))
    }

    fn record(&mut self, stock: &Stock, action: HistoryAction) {
        let id = next_id(&mut self.sequences.history);
        self.history.push(HistoryEntry {
            id,
            stock_id: stock.id,
            product_id: stock.product_id,
            shop_id: stock.shop_id,
            action,
            shelf_quantity: stock.shelf_quantity,
            order_quantity: stock.order_quantity,
            created_at: Utc::now(),
        });
    }

    fn insert_stock(&mut self, params: StockCreate) -> Result<Stock, StoreError> {
        self.check_references(&params)?;
        let id = next_id(&mut self.sequences.stock);
        let stock = Stock::from_params(id, &params);
        self.stocks.insert(id, stock.clone());
        self.record(&stock, HistoryAction::Add);
        info!(stock_id = id, size = self.stocks.len(), "Created");
        Ok(stock)
    }

    fn select_stock_by_product(&self, product_id: i64) -> Option<Stock> {
        let stock = self
            .stocks
            .values()
            .find(|stock| stock.product_id == product_id)
            .cloned();
        debug!(product_id, found = stock.is_some(), "Get");
        stock
    }

    fn replace_stock(&mut self, id: i64, params: StockCreate) -> Result<Option<Stock>, StoreError> {
        if !self.stocks.contains_key(&id) {
            warn!(stock_id = id, "Not found");
            return Ok(None);
        }
        self.check_references(&params)?;
        let stock = Stock::from_params(id, &params);
        self.stocks.insert(id, stock.clone());
        self.record(&stock, HistoryAction::Update);
        info!(stock_id = id, "Replaced");
        Ok(Some(stock))
    }

    fn delete_stock(&mut self, id: i64) -> Option<Stock> {
        let Some(stock) = self.stocks.remove(&id) else {
            warn!(stock_id = id, "Not found");
            return None;
        };
        self.record(&stock, HistoryAction::Remove);
        info!(stock_id = id, size = self.stocks.len(), "Deleted");
        Some(stock)
    }

    fn adjust_stock(
        &mut self,
        id: i64,
        adjustment: StockAdjustment,
    ) -> Result<Option<Stock>, StoreError> {
        let Some(current) = self.stocks.get(&id) else {
            warn!(stock_id = id, "Not found");
            return Ok(None);
        };
        let adjusted = adjustment
            .apply(current)
            .map_err(|e| StoreError::generic(e.to_string()))?;
        self.stocks.insert(id, adjusted.clone());
        self.record(&adjusted, adjustment.history_action());
        info!(
            stock_id = id,
            shelf_quantity = adjusted.shelf_quantity,
            order_quantity = adjusted.order_quantity,
            "Adjusted"
        );
        Ok(Some(adjusted))
    }

    fn filter_stocks(&self, predicate: &Predicate) -> Vec<StockListing> {
        self.stocks
            .values()
            .filter_map(|stock| {
                let product = self.products.get(&stock.product_id)?;
                Some(StockListing {
                    stock: stock.clone(),
                    plu: product.plu.clone(),
                    name: product.name.clone(),
                })
            })
            .filter(|listing| predicate.matches(listing))
            .collect()
    }
}

/// The store actor. Spawn [`StoreActor::run`] on a tokio task.
pub struct StoreActor {
    receiver: mpsc::Receiver<StoreRequest>,
    tables: Tables,
}

impl StoreActor {
    pub fn new(buffer_size: usize) -> (Self, InMemoryGateway) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            tables: Tables::default(),
        };
        (actor, InMemoryGateway { sender })
    }

    /// Processes statements until every gateway handle is dropped or a shutdown request arrives.
    pub async fn run(mut self) {
        info!("Store actor started");

        while let Some(msg) = self.receiver.recv().await {
            let tables = &mut self.tables;
            match msg {
                StoreRequest::InsertProduct { params, respond_to } => {
                    debug!(?params, "Insert product");
                    let _ = respond_to.send(tables.insert_product(params));
                }
                StoreRequest::FilterProducts {
                    predicate,
                    respond_to,
                } => {
                    debug!(?predicate, "Filter products");
                    let _ = respond_to.send(Ok(tables.filter_products(&predicate)));
                }
                StoreRequest::InsertShop { params, respond_to } => {
                    debug!(?params, "Insert shop");
                    let _ = respond_to.send(Ok(tables.insert_shop(params)));
                }
                StoreRequest::InsertStock { params, respond_to } => {
                    debug!(?params, "Create");
                    let _ = respond_to.send(tables.insert_stock(params));
                }
                StoreRequest::SelectStocks { respond_to } => {
                    debug!(size = tables.stocks.len(), "List");
                    let _ = respond_to.send(Ok(tables.stocks.values().cloned().collect()));
                }
                StoreRequest::SelectStockByProduct {
                    product_id,
                    respond_to,
                } => {
                    let _ = respond_to.send(Ok(tables.select_stock_by_product(product_id)));
                }
                StoreRequest::ReplaceStock {
                    id,
                    params,
                    respond_to,
                } => {
                    debug!(stock_id = id, ?params, "Replace");
                    let _ = respond_to.send(tables.replace_stock(id, params));
                }
                StoreRequest::DeleteStock { id, respond_to } => {
                    debug!(stock_id = id, "Delete");
                    let _ = respond_to.send(Ok(tables.delete_stock(id)));
                }
                StoreRequest::AdjustStock {
                    id,
                    adjustment,
                    respond_to,
                } => {
                    debug!(stock_id = id, ?adjustment, "Adjust");
                    let _ = respond_to.send(tables.adjust_stock(id, adjustment));
                }
                StoreRequest::FilterStocks {
                    predicate,
                    respond_to,
                } => {
                    debug!(?predicate, "Filter");
                    let _ = respond_to.send(Ok(tables.filter_stocks(&predicate)));
                }
                StoreRequest::SelectHistory { respond_to } => {
                    debug!(size = tables.history.len(), "History");
                    let _ = respond_to.send(Ok(tables.history.clone()));
                }
                StoreRequest::Shutdown { respond_to } => {
                    let _ = respond_to.send(());
                    break;
                }
            }
        }

        info!(
            products = self.tables.products.len(),
            shops = self.tables.shops.len(),
            stocks = self.tables.stocks.len(),
            history = self.tables.history.len(),
            "Shutdown"
        );
    }
}

/// Sender-side handle to a [`StoreActor`].
#[derive(Clone)]
pub struct InMemoryGateway {
    sender: mpsc::Sender<StoreRequest>,
}

impl InMemoryGateway {
    async fn request<T: Send>(
        &self,
        build: impl FnOnce(Response<T>) -> StoreRequest + Send,
    ) -> Result<T, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| StoreError::generic("store actor closed"))?;
        response
            .await
            .map_err(|_| StoreError::generic("store actor dropped response channel"))?
    }
}

#[async_trait]
impl StorageGateway for InMemoryGateway {
    async fn insert_product(&self, params: ProductCreate) -> Result<Product, StoreError> {
        self.request(|respond_to| StoreRequest::InsertProduct { params, respond_to })
            .await
    }

    async fn filter_products(&self, predicate: &Predicate) -> Result<Vec<Product>, StoreError> {
        let predicate = predicate.clone();
        self.request(|respond_to| StoreRequest::FilterProducts {
            predicate,
            respond_to,
        })
        .await
    }

    async fn insert_shop(&self, params: ShopCreate) -> Result<Shop, StoreError> {
        self.request(|respond_to| StoreRequest::InsertShop { params, respond_to })
            .await
    }

    async fn insert_stock(&self, params: StockCreate) -> Result<Stock, StoreError> {
        self.request(|respond_to| StoreRequest::InsertStock { params, respond_to })
            .await
    }

    async fn select_stocks(&self) -> Result<Vec<Stock>, StoreError> {
        self.request(|respond_to| StoreRequest::SelectStocks { respond_to })
            .await
    }

    async fn select_stock_by_product(&self, product_id: i64) -> Result<Option<Stock>, StoreError> {
        self.request(|respond_to| StoreRequest::SelectStockByProduct {
            product_id,
            respond_to,
        })
        .await
    }

    async fn replace_stock(
        &self,
        id: i64,
        params: StockCreate,
    ) -> Result<Option<Stock>, StoreError> {
        self.request(|respond_to| StoreRequest::ReplaceStock {
            id,
            params,
            respond_to,
        })
        .await
    }

    async fn delete_stock(&self, id: i64) -> Result<Option<Stock>, StoreError> {
        self.request(|respond_to| StoreRequest::DeleteStock { id, respond_to })
            .await
    }

    async fn adjust_stock(
        &self,
        id: i64,
        adjustment: StockAdjustment,
    ) -> Result<Option<Stock>, StoreError> {
        self.request(|respond_to| StoreRequest::AdjustStock {
            id,
            adjustment,
            respond_to,
        })
        .await
    }

    async fn filter_stocks(
        &self,
        predicate: &Predicate,
    ) -> Result<Vec<StockListing>, StoreError> {
        let predicate = predicate.clone();
        self.request(|respond_to| StoreRequest::FilterStocks {
            predicate,
            respond_to,
        })
        .await
    }

    async fn select_history(&self) -> Result<Vec<HistoryEntry>, StoreError> {
        self.request(|respond_to| StoreRequest::SelectHistory { respond_to })
            .await
    }

    async fn close(&self) {
        let (respond_to, done) = oneshot::channel();
        if self
            .sender
            .send(StoreRequest::Shutdown { respond_to })
            .await
            .is_ok()
        {
            let _ = done.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{StockDelta, StockFilter};
    use crate::store::StoreErrorCode;

    async fn seeded() -> (InMemoryGateway, tokio::task::JoinHandle<()>) {
        let (actor, gateway) = StoreActor::new(16);
        let handle = tokio::spawn(actor.run());
        gateway
            .insert_product(ProductCreate {
                plu: "W-1".into(),
                name: "Sparkling Water".into(),
            })
            .await
            .unwrap();
        gateway
            .insert_shop(ShopCreate {
                name: "Downtown".into(),
            })
            .await
            .unwrap();
        (gateway, handle)
    }

    fn params(shelf: i64, order: i64) -> StockCreate {
        StockCreate {
            product_id: 1,
            shelf_quantity: shelf,
            order_quantity: order,
            shop_id: 1,
        }
    }

    #[tokio::test]
    async fn insert_checks_foreign_keys() {
        let (gateway, _handle) = seeded().await;

        let err = gateway
            .insert_stock(StockCreate {
                product_id: 99,
                ..params(1, 1)
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, StoreErrorCode::ForeignKeyViolation);

        let stock = gateway.insert_stock(params(10, 2)).await.unwrap();
        assert_eq!(stock.id, 1);
    }

    #[tokio::test]
    async fn duplicate_plu_is_rejected() {
        let (gateway, _handle) = seeded().await;
        let err = gateway
            .insert_product(ProductCreate {
                plu: "W-1".into(),
                name: "Still Water".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, StoreErrorCode::UniqueViolation);
    }

    #[tokio::test]
    async fn unknown_ids_return_none() {
        let (gateway, _handle) = seeded().await;
        assert_eq!(gateway.delete_stock(7).await.unwrap(), None);
        assert_eq!(gateway.replace_stock(7, params(1, 1)).await.unwrap(), None);
        assert_eq!(
            gateway
                .adjust_stock(7, StockAdjustment::increase(StockDelta::default()))
                .await
                .unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn mutations_append_history_in_order() {
        let (gateway, _handle) = seeded().await;
        let stock = gateway.insert_stock(params(10, 2)).await.unwrap();
        gateway
            .adjust_stock(
                stock.id,
                StockAdjustment::decrease(StockDelta {
                    shelf_quantity: Some(3),
                    order_quantity: None,
                }),
            )
            .await
            .unwrap();
        gateway.replace_stock(stock.id, params(1, 1)).await.unwrap();
        gateway.delete_stock(stock.id).await.unwrap();

        let history = gateway.select_history().await.unwrap();
        let actions: Vec<_> = history.iter().map(|entry| entry.action).collect();
        assert_eq!(
            actions,
            vec![
                HistoryAction::Add,
                HistoryAction::Remove,
                HistoryAction::Update,
                HistoryAction::Remove,
            ]
        );
        assert_eq!(history[1].shelf_quantity, 7);
    }

    #[tokio::test]
    async fn filter_joins_product_columns() {
        let (gateway, _handle) = seeded().await;
        gateway.insert_stock(params(5, 0)).await.unwrap();

        let rows = gateway
            .filter_stocks(&Predicate::for_stocks(&StockFilter::default()))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].plu, "W-1");
        assert_eq!(rows[0].name, "Sparkling Water");
    }

    #[tokio::test]
    async fn close_drains_and_stops_the_actor() {
        let (gateway, handle) = seeded().await;
        gateway.close().await;
        handle.await.unwrap();

        let err = gateway.select_stocks().await.unwrap_err();
        assert_eq!(err.code, StoreErrorCode::Generic);
    }
}
