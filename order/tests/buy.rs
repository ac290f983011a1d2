//! Purchase flow integration tests against an in-process catalog replica.

use std::net::SocketAddr;
use std::sync::Arc;

use catalog_cluster::node::CatalogNode;
use catalog_cluster::store::books::{Book, BookStore};
use order_service::purchase::PurchaseClient;
use serde_json::Value;
use tokio::net::TcpListener;

async fn start_catalog(store: Arc<BookStore>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base = format!("http://{}", addr);

    let node = CatalogNode::new(store, vec![], base.clone(), None);
    let router = node.router();
    tokio::spawn(async move {
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });
    base
}

fn single_copy_store() -> Arc<BookStore> {
    let store = Arc::new(BookStore::new());
    store.insert(Book {
        id: 1,
        title: "Xen and the Art of Surviving Graduate School".to_string(),
        topic: "Graduate School".to_string(),
        quantity: 1,
        price: 15.0,
        sequence_number: 0,
    });
    store
}

#[tokio::test]
async fn test_purchase_succeeds_exactly_once_then_out_of_stock() {
    let store = single_copy_store();
    let base = start_catalog(store.clone()).await;
    let client = PurchaseClient::new(base);

    let (status, body) = client.purchase("1").await;
    assert_eq!(status.as_u16(), 200);
    assert_eq!(body["success"], true);
    assert_eq!(store.get(1).unwrap().quantity, 0);

    let (status, body) = client.purchase("1").await;
    assert_eq!(status.as_u16(), 200);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Book with the specified ID is out of stock");
    assert_eq!(store.get(1).unwrap().quantity, 0);
}

#[tokio::test]
async fn test_purchase_unknown_id_is_404() {
    let base = start_catalog(single_copy_store()).await;
    let client = PurchaseClient::new(base);

    let (status, body) = client.purchase("999").await;
    assert_eq!(status.as_u16(), 404);
    assert_eq!(body["message"], "Book with the specified ID does not exist");
}

#[tokio::test]
async fn test_buy_route_end_to_end() {
    let store = Arc::new(BookStore::with_seed_data());
    let catalog_base = start_catalog(store.clone()).await;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let order_base = format!("http://{}", listener.local_addr().unwrap());
    let app = order_service::router(Arc::new(PurchaseClient::new(catalog_base)));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = reqwest::Client::new();

    let response = client
        .put(format!("{}/buy/2", order_base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(store.get(2).unwrap().quantity, 4);

    let response = client
        .put(format!("{}/buy/abc", order_base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 422);
}
