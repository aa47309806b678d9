//! Messages understood by the in-memory [`StoreActor`](super::StoreActor).

use super::StoreError;
use crate::model::{
    HistoryEntry, Product, ProductCreate, Shop, ShopCreate, Stock, StockCreate, StockListing,
};
use crate::query::Predicate;
use crate::stock::StockAdjustment;
use tokio::sync::oneshot;

/// One-shot reply channel for a single statement.
pub type Response<T> = oneshot::Sender<Result<T, StoreError>>;

/// One variant per statement of [`StorageGateway`](super::StorageGateway).
#[derive(Debug)]
pub enum StoreRequest {
    InsertProduct {
        params: ProductCreate,
        respond_to: Response<Product>,
    },
    FilterProducts {
        predicate: Predicate,
        respond_to: Response<Vec<Product>>,
    },
    InsertShop {
        params: ShopCreate,
        respond_to: Response<Shop>,
    },
    InsertStock {
        params: StockCreate,
        respond_to: Response<Stock>,
    },
    SelectStocks {
        respond_to: Response<Vec<Stock>>,
    },
    SelectStockByProduct {
        product_id: i64,
        respond_to: Response<Option<Stock>>,
    },
    ReplaceStock {
        id: i64,
        params: StockCreate,
        respond_to: Response<Option<Stock>>,
    },
    DeleteStock {
        id: i64,
        respond_to: Response<Option<Stock>>,
    },
    AdjustStock {
        id: i64,
        adjustment: StockAdjustment,
        respond_to: Response<Option<Stock>>,
    },
    FilterStocks {
        predicate: Predicate,
        respond_to: Response<Vec<StockListing>>,
    },
    SelectHistory {
        respond_to: Response<Vec<HistoryEntry>>,
    },
    /// Stops the loop once every message queued before it has been answered.
    Shutdown { respond_to: oneshot::Sender<()> },
}
