//! Integration tests for Hekto.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p hekto-integration-tests
//! ```
//!
//! No external services are needed. [`TestContext::new`] starts, on
//! ephemeral local ports:
//!
//! - a stub catalog answering the GROQ query endpoint from [`fixture_products`]
//! - a stub rate endpoint (see [`stub_rates`] for the address-driven responses)
//! - the storefront router itself
//!
//! Requests go through a cookie-keeping `reqwest` client, so one context is
//! one browser with one session.

#![allow(clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
};
use hekto_storefront::config::{SanityConfig, ShipmentConfig, StorefrontConfig};
use hekto_storefront::routes;
use hekto_storefront::state::AppState;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use url::Url;

/// Catalog API version the stub serves.
const API_VERSION: &str = "2021-08-31";

/// Catalog dataset the stub serves.
const DATASET: &str = "production";

/// Products served by the stub catalog.
#[must_use]
pub fn fixture_products() -> Vec<Value> {
    vec![
        json!({
            "_id": "chair-1",
            "title": "Comfy Chair",
            "price": 10,
            "originalprice": 14,
            "imageUrl": "https://cdn.test/chair.png",
            "tags": ["new arrival", "trending"],
            "categories": ["chairs"],
            "code": "Y523201",
            "description": "A chair for long afternoons.",
            "material": "Oak"
        }),
        json!({
            "_id": "lamp-1",
            "title": "Desk Lamp",
            "price": 4.5,
            "tags": ["featured"],
            "categories": ["lighting", "desks"]
        }),
        json!({
            "_id": "sofa-1",
            "title": "Sofa",
            "price": 20,
            "tags": ["best seller"],
            "categories": ["chairs", "sofas"],
            "badge": "Sale"
        }),
    ]
}

#[derive(Clone)]
struct CatalogStub {
    products: Arc<Vec<Value>>,
    hits: Arc<AtomicUsize>,
}

/// Parse a `$param` value, which the client sends JSON-encoded.
fn param(params: &HashMap<String, String>, name: &str) -> Option<String> {
    params
        .get(name)
        .and_then(|raw| serde_json::from_str::<String>(raw).ok())
}

async fn stub_query(
    State(stub): State<CatalogStub>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    stub.hits.fetch_add(1, Ordering::SeqCst);

    let query = params.get("query").cloned().unwrap_or_default();
    if query.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": { "description": "Missing query", "type": "queryParseError" } })),
        );
    }

    // Best sellers are ordered by a field the catalog rejects.
    if query.contains("salesCount") {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": { "description": "salesCount is not indexed" } })),
        );
    }

    if let Some(id) = param(&params, "$id") {
        if id == "broken-1" {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": { "description": "document store unavailable" } })),
            );
        }
        let found = stub
            .products
            .iter()
            .find(|p| p["_id"] == id.as_str())
            .cloned()
            .unwrap_or(Value::Null);
        return (StatusCode::OK, Json(json!({ "result": found })));
    }

    if let Some(tag) = param(&params, "$tag") {
        let tagged: Vec<Value> = stub
            .products
            .iter()
            .filter(|p| {
                p["tags"]
                    .as_array()
                    .is_some_and(|tags| tags.iter().any(|t| t == tag.as_str()))
            })
            .cloned()
            .collect();
        return (StatusCode::OK, Json(json!({ "result": tagged })));
    }

    (
        StatusCode::OK,
        Json(json!({ "ms": 2, "query": query, "result": stub.products.as_slice() })),
    )
}

/// Stub rate endpoint.
///
/// - city `Nowhere` - no `rates` field
/// - city `Empty` - an empty `rates` array
/// - city `Broken` - 502 with an HTML body
/// - anything else - two usable quotes and one with a malformed amount
pub async fn stub_rates(Json(address): Json<Value>) -> (StatusCode, Json<Value>) {
    match address["city"].as_str() {
        Some("Nowhere") => (StatusCode::OK, Json(json!({ "status": "SUCCESS" }))),
        Some("Empty") => (StatusCode::OK, Json(json!({ "rates": [] }))),
        Some("Broken") => (
            StatusCode::BAD_GATEWAY,
            Json(json!("<html>upstream unavailable</html>")),
        ),
        _ => (
            StatusCode::OK,
            Json(json!({
                "rates": [
                    { "object_id": "rate-usps", "provider": "USPS",
                      "servicelevel": { "name": "Priority Mail" }, "amount": "1099" },
                    { "object_id": "rate-ups", "provider": "UPS",
                      "servicelevel": { "name": "Ground" }, "amount": "450" },
                    { "object_id": "rate-bad", "provider": "DHL",
                      "servicelevel": { "name": "Express" }, "amount": "n/a" }
                ]
            })),
        ),
    }
}

/// Bind an ephemeral local port and serve `app` on it in the background.
pub async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server");
    });
    addr
}

/// A running storefront wired to stub collaborators, plus a browser-like client.
pub struct TestContext {
    pub client: reqwest::Client,
    pub storefront_url: String,
    catalog_hits: Arc<AtomicUsize>,
}

impl TestContext {
    /// Start stubs and a storefront, and return a client with an empty cookie jar.
    pub async fn new() -> Self {
        let catalog = CatalogStub {
            products: Arc::new(fixture_products()),
            hits: Arc::new(AtomicUsize::new(0)),
        };
        let catalog_hits = Arc::clone(&catalog.hits);

        let catalog_addr = serve(
            Router::new()
                .route(
                    &format!("/v{API_VERSION}/data/query/{DATASET}"),
                    get(stub_query),
                )
                .with_state(catalog),
        )
        .await;
        let rates_addr = serve(Router::new().route("/rates", post(stub_rates))).await;

        let config = StorefrontConfig {
            host: "127.0.0.1".parse().expect("loopback address"),
            port: 0,
            base_url: "http://localhost".to_string(),
            sanity: SanityConfig {
                project_id: "test".to_string(),
                dataset: DATASET.to_string(),
                api_version: API_VERSION.to_string(),
                use_cdn: false,
                api_url: Some(format!("http://{catalog_addr}")),
                token: None,
            },
            shipment: ShipmentConfig {
                rates_url: Url::parse(&format!("http://{rates_addr}/rates")).expect("rates url"),
            },
            sentry_dsn: None,
            sentry_environment: None,
        };

        let state = AppState::new(config).expect("storefront state");
        let storefront_addr = serve(routes::app(state)).await;

        Self {
            client: browser(),
            storefront_url: format!("http://{storefront_addr}"),
            catalog_hits,
        }
    }

    /// A second browser against the same storefront: same server, new cookie jar.
    #[must_use]
    pub fn other_browser(&self) -> Self {
        Self {
            client: browser(),
            storefront_url: self.storefront_url.clone(),
            catalog_hits: Arc::clone(&self.catalog_hits),
        }
    }

    /// Number of queries the stub catalog has answered.
    #[must_use]
    pub fn catalog_hits(&self) -> usize {
        self.catalog_hits.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.storefront_url)
    }

    /// `GET` a path and decode the JSON body.
    pub async fn get_json(&self, path: &str) -> (reqwest::StatusCode, Value) {
        let response = self.client.get(self.url(path)).send().await.expect("GET");
        decode(response).await
    }

    /// `POST` a JSON body to a path and decode the JSON response.
    pub async fn post_json(&self, path: &str, body: &Value) -> (reqwest::StatusCode, Value) {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("POST");
        decode(response).await
    }

    /// `POST` with no body and decode the JSON response.
    pub async fn post_empty(&self, path: &str) -> (reqwest::StatusCode, Value) {
        let response = self.client.post(self.url(path)).send().await.expect("POST");
        decode(response).await
    }

    /// `DELETE` a path and decode the JSON response.
    pub async fn delete_json(&self, path: &str) -> (reqwest::StatusCode, Value) {
        let response = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .expect("DELETE");
        decode(response).await
    }
}

fn browser() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("http client")
}

async fn decode(response: reqwest::Response) -> (reqwest::StatusCode, Value) {
    let status = response.status();
    let body = response.text().await.expect("response body");
    let value = serde_json::from_str(&body).unwrap_or(Value::String(body));
    (status, value)
}
