use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Json as AxumJson;
use backoffice::domain::{Product, ProductUpdate, product};
use backoffice::{
    AdminError, DynamicRecord, HttpResourceClient, ListSource, MutationClient, PageWindow,
    UpdatePayload,
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct Seen {
    queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
    bodies: Arc<Mutex<Vec<Value>>>,
}

async fn list_products(
    State(seen): State<Seen>,
    Query(query): Query<HashMap<String, String>>,
) -> AxumJson<Value> {
    seen.queries.lock().unwrap().push(query);
    AxumJson(json!({
        "count": 12,
        "products": [
            {"id": 1, "nome": "Broa", "pacotesFornada": 4, "preco": 12.5, "pesoUnidade": "400g"},
            {"id": 2, "nome": "Pão de queijo", "pacotesFornada": 12, "preco": 19.9, "pesoUnidade": "500g"}
        ]
    }))
}

async fn patch_product(State(seen): State<Seen>, AxumJson(body): AxumJson<Value>) -> AxumJson<Value> {
    seen.bodies.lock().unwrap().push(body.clone());
    AxumJson(body)
}

async fn delete_product(
    State(seen): State<Seen>,
    Query(query): Query<HashMap<String, String>>,
) -> StatusCode {
    seen.queries.lock().unwrap().push(query);
    StatusCode::NO_CONTENT
}

async fn start_server() -> (String, Seen) {
    let seen = Seen::default();
    let router = Router::new()
        .route(
            "/api/products/",
            get(list_products).patch(patch_product).delete(delete_product),
        )
        .route(
            "/api/missing/",
            get(|| async { (StatusCode::NOT_FOUND, AxumJson(json!({"detail": "Not found."}))) }),
        )
        .route(
            "/api/broken/",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, AxumJson(json!({"message": "boom"}))) }),
        )
        .route(
            "/api/plain/",
            get(|| async { (StatusCode::BAD_GATEWAY, "") }),
        )
        .route("/api/nokey/", get(|| async { AxumJson(json!({"count": 3})) }))
        .with_state(seen.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            eprintln!("mock server error: {}", e);
        }
    });
    (format!("http://{}/api", addr), seen)
}

fn client(base_url: &str) -> HttpResourceClient {
    HttpResourceClient::with_client(reqwest::Client::new(), base_url)
}

#[tokio::test]
async fn test_list_sends_one_based_page() {
    let (base_url, seen) = start_server().await;
    let client = client(&base_url);

    let page: backoffice::ListPage<Product> = client
        .fetch_page(product::RESOURCE, PageWindow::new(1, 10).unwrap())
        .await
        .unwrap();

    assert_eq!(page.count, 12);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[1].name, "Pão de queijo");

    let queries = seen.queries.lock().unwrap();
    assert_eq!(queries[0].get("page").map(String::as_str), Some("2"));
    assert_eq!(queries[0].get("page_size").map(String::as_str), Some("10"));
    assert!(queries[0].contains_key("list"));
}

#[tokio::test]
async fn test_update_sends_id_and_changed_fields() {
    let (base_url, seen) = start_server().await;
    let client = client(&base_url);

    let original = Product {
        id: 7,
        name: "Broa".to_string(),
        packs_per_batch: 4.0,
        price: 12.5,
        unit_weight: "400g".to_string(),
    };
    let update = ProductUpdate {
        price: Some(13.5),
        ..Default::default()
    };
    let payload = UpdatePayload::from_typed(&original, &update).unwrap();
    client.update(product::RESOURCE, &payload).await.unwrap();

    let bodies = seen.bodies.lock().unwrap();
    assert_eq!(bodies[0], json!({"id": 7, "preco": 13.5}));
}

#[tokio::test]
async fn test_delete_passes_id_in_query() {
    let (base_url, seen) = start_server().await;
    let client = client(&base_url);

    client
        .delete(product::RESOURCE, &"42".to_string())
        .await
        .unwrap();

    let queries = seen.queries.lock().unwrap();
    assert_eq!(queries[0].get("id").map(String::as_str), Some("42"));
}

#[tokio::test]
async fn test_error_responses_are_normalized() {
    let (base_url, _) = start_server().await;
    let client = client(&base_url);
    let window = PageWindow::default();

    let missing: Result<backoffice::ListPage<DynamicRecord>, _> =
        client.fetch_page("missing", window).await;
    assert!(matches!(missing, Err(AdminError::NotFound(ref m)) if m == "Not found."));

    let broken: Result<backoffice::ListPage<DynamicRecord>, _> =
        client.fetch_page("broken", window).await;
    match broken {
        Err(AdminError::Transport { status, message }) => {
            assert_eq!(status, Some(500));
            assert_eq!(message, "boom");
        }
        other => panic!("unexpected result: {:?}", other),
    }

    let plain: Result<backoffice::ListPage<DynamicRecord>, _> =
        client.fetch_page("plain", window).await;
    let err = plain.unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(err.user_message(), "Bad Gateway");
}

#[tokio::test]
async fn test_missing_items_key_yields_empty_page() {
    let (base_url, _) = start_server().await;
    let client = client(&base_url);

    let page: backoffice::ListPage<DynamicRecord> = client
        .fetch_page("nokey", PageWindow::default())
        .await
        .unwrap();
    assert_eq!(page.count, 3);
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = client(&format!("http://127.0.0.1:{}/api", port));
    let result: Result<backoffice::ListPage<DynamicRecord>, _> =
        client.fetch_page("products", PageWindow::default()).await;
    match result {
        Err(AdminError::Transport { status, .. }) => assert_eq!(status, None),
        other => panic!("unexpected result: {:?}", other),
    }
}
