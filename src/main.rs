use std::net::SocketAddr;

use catalog_cluster::config::Config;
use catalog_cluster::node::CatalogNode;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = Config::from_env()?;
    let node = CatalogNode::from_config(&config);

    tracing::info!(
        "Starting catalog replica {} with {} peer(s)",
        config.public_address,
        config.peer_addresses.len()
    );
    for peer in &config.peer_addresses {
        tracing::info!("  peer: {}", peer);
    }
    if config.front_end_address.is_none() {
        tracing::info!("No front-end cache configured, invalidation disabled");
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Catalog server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        node.router()
            .into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
