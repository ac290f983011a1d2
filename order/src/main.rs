use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use order_service::purchase::PurchaseClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let catalog_address =
        env::var("CATALOG_ADDRESS").context("CATALOG_ADDRESS must point at a catalog replica")?;
    let port: u16 = match env::var("PORT") {
        Ok(raw) => raw.parse().context("PORT must be a port number")?,
        Err(_) => 5001,
    };

    tracing::info!("Order service using catalog at {}", catalog_address);

    let client = Arc::new(PurchaseClient::new(catalog_address));
    let app = order_service::router(client);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Order server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
