use crate::clients::{CatalogClient, StockClient};
use crate::config::StoreConfig;
use crate::store::{PgGateway, StorageGateway, StoreActor, StoreError};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Queue depth of the in-memory store actor.
const STORE_BUFFER: usize = 64;

/// Owns the storage gateway and the clients built on it.
///
/// The gateway is created once, shared by every client as an `Arc<dyn StorageGateway>`, and
/// drained by [`InventorySystem::shutdown`]. Which store backs it is decided here and nowhere
/// else.
///
/// # Example
///
/// ```rust
/// use inventory_stocks::lifecycle::InventorySystem;
/// use serde_json::json;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let system = InventorySystem::in_memory();
/// system.catalog_client.create_product(&json!({"plu": "W-1", "name": "Water"})).await.unwrap();
/// system.catalog_client.create_shop(&json!({"name": "Downtown"})).await.unwrap();
///
/// let stock = system
///     .stock_client
///     .create(&json!({"product_id": 1, "shelf_quantity": 10, "order_quantity": 2, "shop_id": 1}))
///     .await
///     .unwrap();
/// assert_eq!(stock.id, 1);
///
/// system.shutdown().await.unwrap();
/// # });
/// ```
pub struct InventorySystem {
    /// Stock operations
    pub stock_client: StockClient,

    /// Product catalog and shop registration
    pub catalog_client: CatalogClient,

    gateway: Arc<dyn StorageGateway>,

    /// Store tasks owned by the system (empty for external stores)
    handles: Vec<JoinHandle<()>>,
}

impl InventorySystem {
    /// Starts an in-memory store actor. Must be called inside a tokio runtime.
    pub fn in_memory() -> Self {
        let (actor, gateway) = StoreActor::new(STORE_BUFFER);
        let handle = tokio::spawn(actor.run());
        let mut system = Self::with_gateway(Arc::new(gateway));
        system.handles.push(handle);
        system
    }

    /// Connects to Postgres and applies migrations.
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let gateway = PgGateway::connect(config).await?;
        Ok(Self::with_gateway(Arc::new(gateway)))
    }

    /// Wires the clients to an existing gateway, e.g. a [`MockGateway`](crate::store::MockGateway).
    pub fn with_gateway(gateway: Arc<dyn StorageGateway>) -> Self {
        Self {
            stock_client: StockClient::new(gateway.clone()),
            catalog_client: CatalogClient::new(gateway.clone()),
            gateway,
            handles: Vec::new(),
        }
    }

    pub fn gateway(&self) -> Arc<dyn StorageGateway> {
        self.gateway.clone()
    }

    /// Drains the gateway and waits for the store tasks to finish.
    ///
    /// Statements already queued are answered before the store stops. Clients cloned out of the
    /// system stay valid as values, but their calls fail with a store error afterwards.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");

        drop(self.stock_client);
        drop(self.catalog_client);
        self.gateway.close().await;

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Store task failed: {:?}", e);
                return Err(format!("Store task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
