//! # Mock Gateway
//!
//! A [`StorageGateway`] that answers from a queue of expectations, for testing clients
//! without a store.
//!
//! Register the statements you expect, in order, then hand [`MockGateway::gateway`] to the client
//! under test. A statement that arrives out of order, or with no expectation left, panics.
//!
//! ```rust
//! use inventory_stocks::clients::StockClient;
//! use inventory_stocks::store::{MockGateway, StoreError};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let mock = MockGateway::new();
//! mock.expect_select_stocks()
//!     .return_err(StoreError::generic("connection reset by peer"));
//!
//! let client = StockClient::new(mock.gateway());
//! assert!(client.list().await.is_err());
//! mock.verify();
//! # });
//! ```

use super::{StorageGateway, StoreError};
use crate::model::{
    HistoryEntry, Product, ProductCreate, Shop, ShopCreate, Stock, StockCreate, StockListing,
};
use crate::query::Predicate;
use crate::stock::StockAdjustment;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type Reply<T> = Result<T, StoreError>;

/// An expected statement and the reply to give it.
#[derive(Debug)]
enum Expectation {
    InsertProduct(Reply<Product>),
    FilterProducts(Reply<Vec<Product>>),
    InsertShop(Reply<Shop>),
    InsertStock(Reply<Stock>),
    SelectStocks(Reply<Vec<Stock>>),
    SelectStockByProduct {
        product_id: i64,
        response: Reply<Option<Stock>>,
    },
    ReplaceStock {
        id: i64,
        response: Reply<Option<Stock>>,
    },
    DeleteStock {
        id: i64,
        response: Reply<Option<Stock>>,
    },
    AdjustStock {
        id: i64,
        response: Reply<Option<Stock>>,
    },
    FilterStocks(Reply<Vec<StockListing>>),
    SelectHistory(Reply<Vec<HistoryEntry>>),
}

type Queue = Arc<Mutex<VecDeque<Expectation>>>;

fn lock(queue: &Queue) -> MutexGuard<'_, VecDeque<Expectation>> {
    queue.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Expectation-driven gateway. Clones share the same queue.
#[derive(Clone, Default)]
pub struct MockGateway {
    expectations: Queue,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a handle for the client under test.
    pub fn gateway(&self) -> Arc<dyn StorageGateway> {
        Arc::new(self.clone())
    }

    fn builder<T>(&self, wrap: impl FnOnce(Reply<T>) -> Expectation + Send + 'static) -> ExpectationBuilder<T> {
        ExpectationBuilder {
            expectations: self.expectations.clone(),
            wrap: Box::new(wrap),
        }
    }

    pub fn expect_insert_product(&self) -> ExpectationBuilder<Product> {
        self.builder(Expectation::InsertProduct)
    }

    pub fn expect_filter_products(&self) -> ExpectationBuilder<Vec<Product>> {
        self.builder(Expectation::FilterProducts)
    }

    pub fn expect_insert_shop(&self) -> ExpectationBuilder<Shop> {
        self.builder(Expectation::InsertShop)
    }

    pub fn expect_insert_stock(&self) -> ExpectationBuilder<Stock> {
        self.builder(Expectation::InsertStock)
    }

    pub fn expect_select_stocks(&self) -> ExpectationBuilder<Vec<Stock>> {
        self.builder(Expectation::SelectStocks)
    }

    pub fn expect_select_stock_by_product(&self, product_id: i64) -> ExpectationBuilder<Option<Stock>> {
        self.builder(move |response| Expectation::SelectStockByProduct {
            product_id,
            response,
        })
    }

    pub fn expect_replace_stock(&self, id: i64) -> ExpectationBuilder<Option<Stock>> {
        self.builder(move |response| Expectation::ReplaceStock { id, response })
    }

    pub fn expect_delete_stock(&self, id: i64) -> ExpectationBuilder<Option<Stock>> {
        self.builder(move |response| Expectation::DeleteStock { id, response })
    }

    pub fn expect_adjust_stock(&self, id: i64) -> ExpectationBuilder<Option<Stock>> {
        self.builder(move |response| Expectation::AdjustStock { id, response })
    }

    pub fn expect_filter_stocks(&self) -> ExpectationBuilder<Vec<StockListing>> {
        self.builder(Expectation::FilterStocks)
    }

    pub fn expect_select_history(&self) -> ExpectationBuilder<Vec<HistoryEntry>> {
        self.builder(Expectation::SelectHistory)
    }

    /// Panics unless every expectation was consumed.
    pub fn verify(&self) {
        let remaining = lock(&self.expectations);
        if !remaining.is_empty() {
            panic!(
                "Not all expectations were met. {} remaining: {:?}",
                remaining.len(),
                remaining
            );
        }
    }

    fn next(&self, statement: &str) -> Expectation {
        match lock(&self.expectations).pop_front() {
            Some(expectation) => expectation,
            None => panic!("Unexpected statement {statement}: no expectation left"),
        }
    }
}

/// Completes an expectation with the reply the mock should give.
pub struct ExpectationBuilder<T> {
    expectations: Queue,
    wrap: Box<dyn FnOnce(Reply<T>) -> Expectation + Send>,
}

impl<T> ExpectationBuilder<T> {
    pub fn return_ok(self, value: T) {
        self.push(Ok(value));
    }

    pub fn return_err(self, error: StoreError) {
        self.push(Err(error));
    }

    fn push(self, response: Reply<T>) {
        let expectation = (self.wrap)(response);
        lock(&self.expectations).push_back(expectation);
    }
}

fn mismatch(statement: &str, expectation: Expectation) -> ! {
    panic!("Unexpected statement {statement}, expected {expectation:?}")
}

#[async_trait]
impl StorageGateway for MockGateway {
    async fn insert_product(&self, _params: ProductCreate) -> Result<Product, StoreError> {
        match self.next("insert_product") {
            Expectation::InsertProduct(response) => response,
            other => mismatch("insert_product", other),
        }
    }

    async fn filter_products(&self, _predicate: &Predicate) -> Result<Vec<Product>, StoreError> {
        match self.next("filter_products") {
            Expectation::FilterProducts(response) => response,
            other => mismatch("filter_products", other),
        }
    }

    async fn insert_shop(&self, _params: ShopCreate) -> Result<Shop, StoreError> {
        match self.next("insert_shop") {
            Expectation::InsertShop(response) => response,
            other => mismatch("insert_shop", other),
        }
    }

    async fn insert_stock(&self, _params: StockCreate) -> Result<Stock, StoreError> {
        match self.next("insert_stock") {
            Expectation::InsertStock(response) => response,
            other => mismatch("insert_stock", other),
        }
    }

    async fn select_stocks(&self) -> Result<Vec<Stock>, StoreError> {
        match self.next("select_stocks") {
            Expectation::SelectStocks(response) => response,
            other => mismatch("select_stocks", other),
        }
    }

    async fn select_stock_by_product(&self, product_id: i64) -> Result<Option<Stock>, StoreError> {
        match self.next("select_stock_by_product") {
            Expectation::SelectStockByProduct {
                product_id: expected,
                response,
            } => {
                assert_eq!(product_id, expected, "select_stock_by_product product_id");
                response
            }
            other => mismatch("select_stock_by_product", other),
        }
    }

    async fn replace_stock(
        &self,
        id: i64,
        _params: StockCreate,
    ) -> Result<Option<Stock>, StoreError> {
        match self.next("replace_stock") {
            Expectation::ReplaceStock {
                id: expected,
                response,
            } => {
                assert_eq!(id, expected, "replace_stock id");
                response
            }
            other => mismatch("replace_stock", other),
        }
    }

    async fn delete_stock(&self, id: i64) -> Result<Option<Stock>, StoreError> {
        match self.next("delete_stock") {
            Expectation::DeleteStock {
                id: expected,
                response,
            } => {
                assert_eq!(id, expected, "delete_stock id");
                response
            }
            other => mismatch("delete_stock", other),
        }
    }

    async fn adjust_stock(
        &self,
        id: i64,
        _adjustment: StockAdjustment,
    ) -> Result<Option<Stock>, StoreError> {
        match self.next("adjust_stock") {
            Expectation::AdjustStock {
                id: expected,
                response,
            } => {
                assert_eq!(id, expected, "adjust_stock id");
                response
            }
            other => mismatch("adjust_stock", other),
        }
    }

    async fn filter_stocks(
        &self,
        _predicate: &Predicate,
    ) -> Result<Vec<StockListing>, StoreError> {
        match self.next("filter_stocks") {
            Expectation::FilterStocks(response) => response,
            other => mismatch("filter_stocks", other),
        }
    }

    async fn select_history(&self) -> Result<Vec<HistoryEntry>, StoreError> {
        match self.next("select_history") {
            Expectation::SelectHistory(response) => response,
            other => mismatch("select_history", other),
        }
    }

    async fn close(&self) {}
}
