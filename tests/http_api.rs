//! End-to-end tests for the contacts HTTP API.
//!
//! Each test serves the real router on an ephemeral port, backed by a JSON
//! store in a temp dir and the mock weather provider.

use agenda::adapters::clock::ManualClock;
use agenda::adapters::http;
use agenda::adapters::persistence::JsonRepo;
use agenda::adapters::weather::MockWeatherAdapter;
use agenda::domain::WeatherFailure;
use agenda::ports::ContactsPort;
use agenda::usecases::{CachePolicy, ContactService, EnrichmentService, WeatherCache};
use reqwest::StatusCode;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::net::TcpListener;

struct TestApp {
    base: String,
    client: reqwest::Client,
    provider: Arc<MockWeatherAdapter>,
    _dir: tempfile::TempDir,
}

impl TestApp {
    async fn spawn() -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let repo = Arc::new(
            JsonRepo::open(dir.path().join("contacts.json"))
                .await
                .expect("open store"),
        );
        let provider = Arc::new(MockWeatherAdapter::default());
        let cache = Arc::new(WeatherCache::new(
            provider.clone(),
            Arc::new(ManualClock::new(0)),
            CachePolicy::default(),
        ));
        let enrichment = Arc::new(EnrichmentService::new(cache));
        let contacts: Arc<dyn ContactsPort> = Arc::new(ContactService::new(repo, enrichment));

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(http::serve(
            listener,
            http::router(contacts),
            std::future::pending(),
        ));

        Self {
            base: format!("http://{}", addr),
            client: reqwest::Client::new(),
            provider,
            _dir: dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn create(&self, body: Value) -> (StatusCode, Value) {
        let res = self
            .client
            .post(self.url("/contacts"))
            .json(&body)
            .send()
            .await
            .expect("request");
        let status = res.status();
        (status, res.json().await.unwrap_or(Value::Null))
    }

    async fn get_json(&self, path: &str) -> (StatusCode, Value) {
        let res = self.client.get(self.url(path)).send().await.expect("request");
        let status = res.status();
        (status, res.json().await.unwrap_or(Value::Null))
    }
}

fn contact(name: &str, email: &str, city: &str, phone: &str) -> Value {
    json!({
        "name": name,
        "address": { "street": "Rua das Flores, 10", "city": city, "state": "sp" },
        "email": email,
        "phones": [phone]
    })
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::spawn().await;
    let (status, body) = app.get_json("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let app = TestApp::spawn().await;
    let (status, body) = app.get_json("/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_create_normalizes_and_skips_weather() {
    let app = TestApp::spawn().await;
    let (status, body) = app
        .create(contact("  Ana  ", "Ana@Example.COM", "Campinas", "(19) 99999-0000"))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);
    assert_eq!(body["name"], "Ana");
    assert_eq!(body["email"], "ana@example.com");
    assert_eq!(body["address"]["state"], "SP");
    assert_eq!(body["phones"], json!(["19999990000"]));
    assert!(body.get("weather").is_none());
    assert_eq!(app.provider.calls(), 0);
}

#[tokio::test]
async fn test_create_validation_error_lists_details() {
    let app = TestApp::spawn().await;
    let (status, body) = app
        .create(json!({ "name": "", "email": "not-an-email", "phones": [] }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    let details = body["error"]["details"].as_array().expect("details");
    assert!(details.len() >= 3);
}

#[tokio::test]
async fn test_malformed_json_is_validation_error() {
    let app = TestApp::spawn().await;
    let res = app
        .client
        .post(app.url("/contacts"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_duplicate_phone_is_rejected() {
    let app = TestApp::spawn().await;
    let mut payload = contact("Ana", "ana@example.com", "Campinas", "19 99999-0000");
    payload["phones"] = json!(["19 99999-0000", "(19) 999990000"]);

    let (status, body) = app.create(payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "PHONE_DUPLICATE");
}

#[tokio::test]
async fn test_duplicate_email_is_conflict() {
    let app = TestApp::spawn().await;
    let (status, _) = app
        .create(contact("Ana", "ana@example.com", "Campinas", "19999990000"))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .create(contact("Other", "ANA@example.com", "Santos", "13999990000"))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "UNIQUE_VIOLATION");
}

#[tokio::test]
async fn test_get_is_enriched() {
    let app = TestApp::spawn().await;
    let (_, created) = app
        .create(contact("Ana", "ana@example.com", "Campinas", "19999990000"))
        .await;

    let (status, body) = app.get_json(&format!("/contacts/{}", created["id"])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Ana");
    assert_eq!(body["weather"]["city"], "Campinas");
    assert_eq!(body["weather"]["temperature_c"], 25.0);
    assert_eq!(body["weather"]["condition_code"], "clear_day");
    assert!(body["suggestion"].as_str().unwrap().contains("outdoor"));
    assert_eq!(
        app.provider.last_query(),
        Some(("Campinas".to_string(), "SP".to_string()))
    );

    // Second read within the TTL is served from cache.
    app.get_json(&format!("/contacts/{}", created["id"])).await;
    assert_eq!(app.provider.calls(), 1);
}

#[tokio::test]
async fn test_get_with_provider_down_still_succeeds() {
    let app = TestApp::spawn().await;
    app.provider
        .set_result(Err(WeatherFailure::ProviderUnavailable));
    let (_, created) = app
        .create(contact("Ana", "ana@example.com", "Campinas", "19999990000"))
        .await;

    let (status, body) = app.get_json(&format!("/contacts/{}", created["id"])).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["weather"].is_null());
    assert!(body["suggestion"].as_str().unwrap().contains("unavailable"));
}

#[tokio::test]
async fn test_list_order_and_filters() {
    let app = TestApp::spawn().await;
    app.create(contact("Ana", "ana@example.com", "Campinas", "19999990000"))
        .await;
    app.create(contact("Bruno", "bruno@example.com", "Santos", "13988887777"))
        .await;
    app.create(contact("Carla", "carla@example.com", "Campinas", "19977776666"))
        .await;

    let (status, body) = app.get_json("/contacts").await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Ana", "Bruno", "Carla"]);
    assert!(body.as_array().unwrap().iter().all(|c| c["weather"].is_object()));

    let (_, body) = app.get_json("/contacts?address=santos").await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "Bruno");

    let (_, body) = app.get_json("/contacts?phone=(19)%209777").await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "Carla");

    let (_, body) = app.get_json("/contacts?name=zzz").await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_bad_query_is_validation_error() {
    let app = TestApp::spawn().await;
    let (status, body) = app.get_json("/contacts?name=a&name=b").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["details"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_update_replaces_fields() {
    let app = TestApp::spawn().await;
    let (_, created) = app
        .create(contact("Ana", "ana@example.com", "Campinas", "19999990000"))
        .await;

    let res = app
        .client
        .put(app.url(&format!("/contacts/{}", created["id"])))
        .json(&contact("Ana Maria", "ana.maria@example.com", "Santos", "13999990000"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["name"], "Ana Maria");
    assert_eq!(body["address"]["city"], "Santos");
    assert_eq!(body["created_at"], created["created_at"]);

    let res = app
        .client
        .put(app.url("/contacts/999"))
        .json(&contact("X", "x@example.com", "Y", "11999990000"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_then_not_found() {
    let app = TestApp::spawn().await;
    let (_, created) = app
        .create(contact("Ana", "ana@example.com", "Campinas", "19999990000"))
        .await;
    let path = format!("/contacts/{}", created["id"]);

    let res = app.client.delete(app.url(&path)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let (status, _) = app.get_json(&path).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let res = app.client.delete(app.url(&path)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let (_, body) = app.get_json("/contacts").await;
    assert_eq!(body, json!([]));

    // The email is free again once its owner is deleted.
    let (status, _) = app
        .create(contact("Ana 2", "ana@example.com", "Campinas", "19999990000"))
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_non_numeric_id_is_not_found() {
    let app = TestApp::spawn().await;
    let (status, body) = app.get_json("/contacts/abc").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}
