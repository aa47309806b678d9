//! # Postgres Store
//!
//! [`StorageGateway`] over a `sqlx` connection pool.
//!
//! Every gateway method is exactly one SQL statement. Stock mutations are written as a
//! data-modifying CTE: the `INSERT`/`UPDATE`/`DELETE` returns the affected row, a second CTE
//! appends the history entry from it, and the outer `SELECT` hands the row back. Row change and
//! history append therefore commit together without an explicit transaction.
//!
//! Relative adjustments are computed by the database (`col + COALESCE($n, 0)` and
//! `GREATEST(col - COALESCE($n, 0), 0)`), so concurrent calls on one row serialize on its row
//! lock and never lose updates.
//!
//! Database URLs and passwords are never logged.

use super::{StorageGateway, StoreError, StoreErrorCode};
use crate::config::StoreConfig;
use crate::model::{
    HistoryAction, HistoryEntry, Product, ProductCreate, Shop, ShopCreate, Stock, StockCreate,
    StockListing,
};
use crate::query::{Predicate, SqlParam};
use crate::stock::{Direction, StockAdjustment};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{FromRow, PgPool};
use tracing::info;

const STOCK_COLUMNS: &str = "id, product_id, shelf_quantity, order_quantity, shop_id";

/// Row shape of `stocks`.
#[derive(Debug, FromRow)]
struct DbStock {
    id: i64,
    product_id: i64,
    shelf_quantity: i64,
    order_quantity: i64,
    shop_id: i64,
}

impl From<DbStock> for Stock {
    fn from(row: DbStock) -> Self {
        Stock {
            id: row.id,
            product_id: row.product_id,
            shelf_quantity: row.shelf_quantity,
            order_quantity: row.order_quantity,
            shop_id: row.shop_id,
        }
    }
}

/// Row shape of the stock ⨝ product join.
#[derive(Debug, FromRow)]
struct DbStockListing {
    id: i64,
    product_id: i64,
    shelf_quantity: i64,
    order_quantity: i64,
    shop_id: i64,
    plu: String,
    name: String,
}

impl From<DbStockListing> for StockListing {
    fn from(row: DbStockListing) -> Self {
        StockListing {
            stock: Stock {
                id: row.id,
                product_id: row.product_id,
                shelf_quantity: row.shelf_quantity,
                order_quantity: row.order_quantity,
                shop_id: row.shop_id,
            },
            plu: row.plu,
            name: row.name,
        }
    }
}

#[derive(Debug, FromRow)]
struct DbProduct {
    id: i64,
    plu: String,
    name: String,
}

#[derive(Debug, FromRow)]
struct DbShop {
    id: i64,
    name: String,
}

#[derive(Debug, FromRow)]
struct DbHistory {
    id: i64,
    stock_id: i64,
    product_id: i64,
    shop_id: i64,
    action: String,
    shelf_quantity: i64,
    order_quantity: i64,
    created_at: DateTime<Utc>,
}

fn history_from_db(row: DbHistory) -> Result<HistoryEntry, StoreError> {
    Ok(HistoryEntry {
        id: row.id,
        stock_id: row.stock_id,
        product_id: row.product_id,
        shop_id: row.shop_id,
        action: row.action.parse::<HistoryAction>().map_err(StoreError::generic)?,
        shelf_quantity: row.shelf_quantity,
        order_quantity: row.order_quantity,
        created_at: row.created_at,
    })
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        let code = match &err {
            sqlx::Error::Database(db_err) => db_err
                .code()
                .map(|code| StoreErrorCode::from_sqlstate(&code))
                .unwrap_or(StoreErrorCode::Generic),
            _ => StoreErrorCode::Generic,
        };
        StoreError::new(code, err.to_string())
    }
}

/// Wraps a stock mutation so that it also appends a history entry.
///
/// `mutation` must not carry its own `RETURNING` clause. The history action is bound at
/// `action_placeholder`.
fn with_history(mutation: &str, action_placeholder: usize) -> String {
    format!(
        "WITH changed AS ({mutation} RETURNING {STOCK_COLUMNS}), \
         logged AS (\
             INSERT INTO history (stock_id, product_id, shop_id, action, shelf_quantity, order_quantity) \
             SELECT id, product_id, shop_id, ${action_placeholder}, shelf_quantity, order_quantity FROM changed\
         ) \
         SELECT {STOCK_COLUMNS} FROM changed"
    )
}

fn adjustment_statement(direction: Direction) -> String {
    let mutation = match direction {
        Direction::Increase => {
            "UPDATE stocks SET \
                 shelf_quantity = shelf_quantity + COALESCE($2, 0), \
                 order_quantity = order_quantity + COALESCE($3, 0) \
             WHERE id = $1"
        }
        Direction::Decrease => {
            "UPDATE stocks SET \
                 shelf_quantity = GREATEST(shelf_quantity - COALESCE($2, 0), 0), \
                 order_quantity = GREATEST(order_quantity - COALESCE($3, 0), 0) \
             WHERE id = $1"
        }
    };
    with_history(mutation, 4)
}

/// Postgres-backed gateway.
pub struct PgGateway {
    pool: PgPool,
}

impl PgGateway {
    /// Opens the pool and applies the embedded migrations before returning.
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.database);
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .idle_timeout(config.idle_timeout)
            .acquire_timeout(config.connect_timeout)
            .connect_with(options)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StoreError::generic(e.to_string()))?;

        info!(
            host = %config.host,
            database = %config.database,
            max_connections = config.max_connections,
            "Connected"
        );
        Ok(Self::from_pool(pool))
    }

    /// Uses an existing pool. The schema is assumed to be migrated.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StorageGateway for PgGateway {
    async fn insert_product(&self, params: ProductCreate) -> Result<Product, StoreError> {
        let row = sqlx::query_as::<_, DbProduct>(
            "INSERT INTO products (plu, name) VALUES ($1, $2) RETURNING id, plu, name",
        )
        .bind(&params.plu)
        .bind(&params.name)
        .fetch_one(&self.pool)
        .await?;
        Ok(Product::new(row.id, row.plu, row.name))
    }

    async fn filter_products(&self, predicate: &Predicate) -> Result<Vec<Product>, StoreError> {
        let fragment = predicate.to_sql(1);
        let sql = format!(
            "SELECT id, plu, name FROM products WHERE {} ORDER BY id",
            fragment.sql
        );
        let mut query = sqlx::query_as::<_, DbProduct>(&sql);
        for param in fragment.params {
            query = match param {
                SqlParam::Text(value) => query.bind(value),
                SqlParam::Int(value) => query.bind(value),
            };
        }
        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows
            .into_iter()
            .map(|row| Product::new(row.id, row.plu, row.name))
            .collect())
    }

    async fn insert_shop(&self, params: ShopCreate) -> Result<Shop, StoreError> {
        let row = sqlx::query_as::<_, DbShop>(
            "INSERT INTO shops (name) VALUES ($1) RETURNING id, name",
        )
        .bind(&params.name)
        .fetch_one(&self.pool)
        .await?;
        Ok(Shop {
            id: row.id,
            name: row.name,
        })
    }

    async fn insert_stock(&self, params: StockCreate) -> Result<Stock, StoreError> {
        let sql = with_history(
            "INSERT INTO stocks (product_id, shelf_quantity, order_quantity, shop_id) \
             VALUES ($1, $2, $3, $4)",
            5,
        );
        let row = sqlx::query_as::<_, DbStock>(&sql)
            .bind(params.product_id)
            .bind(params.shelf_quantity)
            .bind(params.order_quantity)
            .bind(params.shop_id)
            .bind(HistoryAction::Add.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn select_stocks(&self) -> Result<Vec<Stock>, StoreError> {
        let sql = format!("SELECT {STOCK_COLUMNS} FROM stocks ORDER BY id");
        let rows = sqlx::query_as::<_, DbStock>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Stock::from).collect())
    }

    async fn select_stock_by_product(&self, product_id: i64) -> Result<Option<Stock>, StoreError> {
        let sql = format!(
            "SELECT {STOCK_COLUMNS} FROM stocks WHERE product_id = $1 ORDER BY id LIMIT 1"
        );
        let row = sqlx::query_as::<_, DbStock>(&sql)
            .bind(product_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Stock::from))
    }

    async fn replace_stock(
        &self,
        id: i64,
        params: StockCreate,
    ) -> Result<Option<Stock>, StoreError> {
        let sql = with_history(
            "UPDATE stocks SET product_id = $2, shelf_quantity = $3, order_quantity = $4, shop_id = $5 \
             WHERE id = $1",
            6,
        );
        let row = sqlx::query_as::<_, DbStock>(&sql)
            .bind(id)
            .bind(params.product_id)
            .bind(params.shelf_quantity)
            .bind(params.order_quantity)
            .bind(params.shop_id)
            .bind(HistoryAction::Update.as_str())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Stock::from))
    }

    async fn delete_stock(&self, id: i64) -> Result<Option<Stock>, StoreError> {
        let sql = with_history("DELETE FROM stocks WHERE id = $1", 2);
        let row = sqlx::query_as::<_, DbStock>(&sql)
            .bind(id)
            .bind(HistoryAction::Remove.as_str())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Stock::from))
    }

    async fn adjust_stock(
        &self,
        id: i64,
        adjustment: StockAdjustment,
    ) -> Result<Option<Stock>, StoreError> {
        let sql = adjustment_statement(adjustment.direction);
        let row = sqlx::query_as::<_, DbStock>(&sql)
            .bind(id)
            .bind(adjustment.delta.shelf_quantity)
            .bind(adjustment.delta.order_quantity)
            .bind(adjustment.history_action().as_str())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Stock::from))
    }

    async fn filter_stocks(
        &self,
        predicate: &Predicate,
    ) -> Result<Vec<StockListing>, StoreError> {
        let fragment = predicate.to_sql(1);
        let sql = format!(
            "SELECT stocks.id, stocks.product_id, stocks.shelf_quantity, stocks.order_quantity, \
                    stocks.shop_id, products.plu, products.name \
             FROM stocks JOIN products ON products.id = stocks.product_id \
             WHERE {} ORDER BY stocks.id",
            fragment.sql
        );
        let mut query = sqlx::query_as::<_, DbStockListing>(&sql);
        for param in fragment.params {
            query = match param {
                SqlParam::Text(value) => query.bind(value),
                SqlParam::Int(value) => query.bind(value),
            };
        }
        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(StockListing::from).collect())
    }

    async fn select_history(&self) -> Result<Vec<HistoryEntry>, StoreError> {
        let rows = sqlx::query_as::<_, DbHistory>(
            "SELECT id, stock_id, product_id, shop_id, action, shelf_quantity, order_quantity, created_at \
             FROM history ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(history_from_db).collect()
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("Pool closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutations_append_history_in_the_same_statement() {
        let sql = with_history("DELETE FROM stocks WHERE id = $1", 2);
        assert!(sql.starts_with("WITH changed AS (DELETE FROM stocks WHERE id = $1 RETURNING "));
        assert!(sql.contains("INSERT INTO history"));
        assert!(sql.contains("$2, shelf_quantity, order_quantity FROM changed"));
        assert!(sql.ends_with("FROM changed"));
    }

    #[test]
    fn decrease_clamps_in_sql() {
        let sql = adjustment_statement(Direction::Decrease);
        assert!(sql.contains("GREATEST(shelf_quantity - COALESCE($2, 0), 0)"));
        assert!(sql.contains("GREATEST(order_quantity - COALESCE($3, 0), 0)"));

        let sql = adjustment_statement(Direction::Increase);
        assert!(sql.contains("shelf_quantity = shelf_quantity + COALESCE($2, 0)"));
    }

    #[test]
    fn non_database_errors_are_generic() {
        let err: StoreError = sqlx::Error::PoolTimedOut.into();
        assert_eq!(err.code, StoreErrorCode::Generic);
    }
}
