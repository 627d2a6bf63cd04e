use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use stockwatch::error::MessagingError;
use stockwatch::models::Quote;
use stockwatch::services::alert_store::{AlertStore, JsonFileAlertStore};
use stockwatch::services::directory::UserDirectory;
use stockwatch::services::engine::Engine;
use stockwatch::services::notifier::Notifier;
use stockwatch::services::quotes::QuoteSource;
use stockwatch::services::telegram::{InboundSender, Messaging};
use stockwatch::{config, routes, AppState};

struct FakeQuotes(HashMap<String, f64>);

#[async_trait]
impl QuoteSource for FakeQuotes {
    async fn fetch(&self, symbol: &str) -> Quote {
        match self.0.get(symbol) {
            Some(p) => Quote::Price(*p),
            None => Quote::Unavailable,
        }
    }
}

struct FakeMessaging {
    senders: Vec<InboundSender>,
    sent: Mutex<Vec<(i64, String)>>,
}

#[async_trait]
impl Messaging for FakeMessaging {
    async fn list_inbound_senders(&self) -> Result<Vec<InboundSender>, MessagingError> {
        Ok(self.senders.clone())
    }

    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), MessagingError> {
        self.sent.lock().unwrap().push((chat_id, text.to_string()));
        Ok(())
    }
}

async fn test_state(prices: &[(&str, f64)], senders: &[(&str, i64)]) -> (AppState, TempDir) {
    let tmp = TempDir::new().unwrap();

    let mut settings = config::load();
    settings.alerts_file = tmp.path().join("alerts.json").display().to_string();
    settings.users_file = tmp.path().join("users.json").display().to_string();
    settings.exchange_suffix = ".NS".to_string();

    let quotes = Arc::new(FakeQuotes(
        prices.iter().map(|(s, p)| (s.to_string(), *p)).collect(),
    ));

    let messaging: Arc<dyn Messaging> = Arc::new(FakeMessaging {
        senders: senders
            .iter()
            .map(|(h, id)| InboundSender {
                handle: h.to_string(),
                chat_id: *id,
            })
            .collect(),
        sent: Mutex::new(Vec::new()),
    });

    let store = Arc::new(JsonFileAlertStore::new(&settings.alerts_file));

    let directory = Arc::new(
        UserDirectory::open(&settings.users_file, Arc::clone(&messaging))
            .await
            .unwrap(),
    );

    let engine = Arc::new(Engine::new(
        quotes,
        store.clone(),
        directory.clone(),
        Notifier::new(messaging),
    ));

    let state = AppState {
        settings,
        store,
        directory,
        engine,
    };

    (state, tmp)
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<axum::body::Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(body.to_string()))
        .unwrap()
}

async fn response_json(res: axum::response::Response) -> serde_json::Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn add_alert_with_missing_fields_returns_400() {
    let (state, _tmp) = test_state(&[], &[]).await;
    let app = routes::app(state);

    let res = app
        .oneshot(json_request("POST", "/add-alert", r#"{"symbol":"TCS"}"#))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = response_json(res).await;
    assert_eq!(body["error"], "Missing required fields.");
}

#[tokio::test]
async fn add_alert_rejects_bad_condition_and_price() {
    let (state, _tmp) = test_state(&[], &[]).await;
    let app = routes::app(state);

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/add-alert",
            r#"{"symbol":"TCS","condition":"sideways","price":10.0,"username":"bob"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app
        .oneshot(json_request(
            "POST",
            "/add-alert",
            r#"{"symbol":"TCS","condition":"above","price":-1.0,"username":"bob"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = response_json(res).await;
    assert_eq!(body["error"], "threshold must be a positive number");
}

#[tokio::test]
async fn add_then_list_round_trip() {
    let (state, _tmp) = test_state(&[], &[]).await;
    let app = routes::app(state);

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/add-alert",
            r#"{"symbol":"tcs","condition":"above","price":3000.0,"username":"bob"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app
        .oneshot(json_request("POST", "/alerts", r#"{"username":"@bob"}"#))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body = response_json(res).await;
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["symbol"], "TCS.NS");
    assert_eq!(list[0]["condition"], "above");
    assert_eq!(list[0]["owner"], "@bob");
}

#[tokio::test]
async fn register_twice_reports_existing_user() {
    let (state, _tmp) = test_state(&[], &[]).await;
    let app = routes::app(state);

    let res = app
        .clone()
        .oneshot(json_request("POST", "/register", r#"{"username":"@bob"}"#))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = app
        .oneshot(json_request("POST", "/register", r#"{"username":"bob"}"#))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = response_json(res).await;
    assert_eq!(body["message"], "User already exists");
}

#[tokio::test]
async fn delete_is_owner_checked() {
    let (state, _tmp) = test_state(&[], &[]).await;
    let app = routes::app(state.clone());

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/add-alert",
            r#"{"symbol":"TCS","condition":"above","price":3000.0,"username":"bob"}"#,
        ))
        .await
        .unwrap();
    let id = response_json(res).await["alert"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    // Someone else cannot delete it.
    let res = app
        .clone()
        .oneshot(json_request(
            "DELETE",
            &format!("/alerts/{id}"),
            r#"{"username":"@mallory"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(state.store.load_all().await.unwrap().len(), 1);

    let res = app
        .oneshot(json_request(
            "DELETE",
            &format!("/alerts/{id}"),
            r#"{"username":"@bob"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(state.store.load_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn check_alerts_runs_a_cycle_and_empties_the_store() {
    let (state, _tmp) = test_state(&[("RELIANCE.NS", 2550.25)], &[("@bob", 555)]).await;
    let app = routes::app(state.clone());

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/add-alert",
            r#"{"symbol":"RELIANCE","condition":"above","price":2500.0,"username":"@bob"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/check-alerts?username=@bob")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body = response_json(res).await;
    let triggered = body["triggered"].as_array().unwrap();
    assert_eq!(triggered.len(), 1);
    assert_eq!(triggered[0]["symbol"], "RELIANCE.NS");

    assert!(state.store.load_all().await.unwrap().is_empty());
}
