use inventory_stocks::config::{ConfigError, StoreConfig};
use inventory_stocks::lifecycle::{setup_tracing, InventorySystem};
use inventory_stocks::reply::Reply;
use serde_json::json;
use tracing::{info, info_span, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let system = match StoreConfig::from_env() {
        Ok(config) => {
            info!(?config, "Using Postgres store");
            InventorySystem::connect(&config)
                .await
                .map_err(|e| e.to_string())?
        }
        Err(ConfigError::Missing(key)) => {
            info!(missing = key, "No database configured, using in-memory store");
            InventorySystem::in_memory()
        }
        Err(e) => return Err(e.to_string()),
    };

    let ids = async {
        let product = system
            .catalog_client
            .create_product(&json!({ "plu": "DEMO-1", "name": "Sparkling Water" }))
            .await;
        log_reply("create product", Reply::from_result(&product, 201));

        let shop = system
            .catalog_client
            .create_shop(&json!({ "name": "Downtown" }))
            .await;
        log_reply("create shop", Reply::from_result(&shop, 201));

        Some((product.ok()?.id, shop.ok()?.id))
    }
    .instrument(info_span!("catalog_setup"))
    .await;

    let Some((product_id, shop_id)) = ids else {
        warn!("Demo catalog could not be created");
        return system.shutdown().await;
    };

    let stock = system
        .stock_client
        .create(&json!({
            "product_id": product_id,
            "shelf_quantity": 10,
            "order_quantity": 2,
            "shop_id": shop_id,
        }))
        .await;
    log_reply("create", Reply::from_result(&stock, 201));

    let id = match &stock {
        Ok(stock) => stock.id.to_string(),
        Err(e) => {
            warn!(error = %e, "Demo stock could not be created");
            return system.shutdown().await;
        }
    };

    let increased = system
        .stock_client
        .increase(&id, &json!({ "shelf_quantity": 5 }))
        .await;
    log_reply("increase", Reply::from_result(&increased, 200));

    let decreased = system
        .stock_client
        .decrease(&id, &json!({ "order_quantity": 10 }))
        .await;
    log_reply("decrease", Reply::from_result(&decreased, 200));

    let reply = match system.stock_client.delete(&id).await {
        Ok(deleted) => Reply::deleted(&deleted),
        Err(e) => Reply::error(&e),
    };
    log_reply("delete", reply);

    let gone = system.stock_client.get(&id).await;
    log_reply("get", Reply::from_result(&gone, 200));

    let history = system.stock_client.history().await;
    log_reply("history", Reply::from_result(&history, 200));

    system.shutdown().await
}

fn log_reply(operation: &str, reply: Reply) {
    info!(operation, status = reply.status, body = %reply.body, "Reply");
}
