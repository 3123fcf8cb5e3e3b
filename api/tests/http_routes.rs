//! Router tests for the SmeraldoCoin HTTP API, driven through `oneshot`.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use economics::TierTable;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use smeraldo_api::{create_app, ApiState, USER_ID_HEADER};
use smeraldo_core::RewardPolicy;
use smeraldo_mining::AccountRegistry;
use smeraldo_storage::{MemoryStore, Store};
use std::sync::Arc;
use tower::ServiceExt;

struct TestApp {
    store: Arc<dyn Store>,
    router: Router,
}

impl TestApp {
    fn new() -> Self {
        Self::with_policy(RewardPolicy::default())
    }

    fn with_policy(policy: RewardPolicy) -> Self {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let state = ApiState::new(store.clone(), policy, TierTable::standard());
        Self {
            store,
            router: create_app(state, true),
        }
    }

    fn seed_admin(&self) -> u64 {
        AccountRegistry::new(self.store.clone())
            .ensure_admin("root", "root@smeraldo.io", Utc::now())
            .unwrap()
            .id
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::String(
                String::from_utf8_lossy(&bytes).into_owned(),
            ))
        };
        (status, body)
    }

    async fn register(&self, username: &str) -> u64 {
        let (status, body) = self
            .send(json_request(
                Method::POST,
                "/register",
                None,
                json!({ "username": username, "email": format!("{}@smeraldo.io", username) }),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_u64().unwrap()
    }
}

fn request(method: Method, uri: &str, user: Option<u64>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(id) = user {
        builder = builder.header(USER_ID_HEADER, id.to_string());
    }
    builder.body(Body::empty()).unwrap()
}

fn json_request(method: Method, uri: &str, user: Option<u64>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(id) = user {
        builder = builder.header(USER_ID_HEADER, id.to_string());
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn test_health_and_root() {
    let app = TestApp::new();
    let (status, body) = app.send(request(Method::GET, "/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = app.send(request(Method::GET, "/", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "SmeraldoCoin API");
}

#[tokio::test]
async fn test_register_and_fetch_user() {
    let app = TestApp::new();
    let id = app.register("emerald").await;

    let (status, body) = app.send(request(Method::GET, "/user", Some(id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "emerald");
    assert_eq!(body["totalCoins"], 0);
    assert_eq!(body["role"], "user");
    assert!(body["walletAddress"].is_null());
}

#[tokio::test]
async fn test_register_rejects_duplicates_and_blanks() {
    let app = TestApp::new();
    app.register("emerald").await;

    let (status, body) = app
        .send(json_request(
            Method::POST,
            "/register",
            None,
            json!({ "username": "EMERALD", "email": "other@smeraldo.io" }),
        ))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");

    let (status, body) = app
        .send(json_request(Method::POST, "/register", None, json!({ "username": "x" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "MISSING_FIELD");
}

#[tokio::test]
async fn test_missing_or_bad_identity_is_unauthorized() {
    let app = TestApp::new();
    let (status, body) = app.send(request(Method::POST, "/claim/click", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");

    let bad = Request::builder()
        .method(Method::GET)
        .uri("/user")
        .header(USER_ID_HEADER, "not-a-number")
        .body(Body::empty())
        .unwrap();
    let (status, _) = app.send(bad).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_user_is_not_found() {
    let app = TestApp::new();
    let (status, body) = app.send(request(Method::POST, "/claim/click", Some(77))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_click_until_daily_limit() {
    let policy = RewardPolicy {
        max_clicks_per_day: 2,
        ..RewardPolicy::default()
    };
    let app = TestApp::with_policy(policy);
    let id = app.register("clicker").await;

    let (status, body) = app.send(request(Method::POST, "/claim/click", Some(id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reward"], 10);
    assert_eq!(body["clicksRemaining"], 1);
    assert_eq!(body["user"]["clickCoins"], 10);

    app.send(request(Method::POST, "/claim/click", Some(id))).await;
    let (status, body) = app.send(request(Method::POST, "/claim/click", Some(id))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "MAX_CLICKS");

    let (_, activities) = app
        .send(request(Method::GET, "/mining/activities", Some(id)))
        .await;
    let activities = activities.as_array().unwrap();
    assert_eq!(activities.len(), 2);
    assert_eq!(activities[0]["type"], "CLICK");
    assert_eq!(activities[0]["amount"], 10);
}

#[tokio::test]
async fn test_click_refused_when_daily_coin_cap_reached() {
    // One passive grant fills the whole daily allowance
    let policy = RewardPolicy {
        max_coins_per_day: 500,
        ..RewardPolicy::default()
    };
    let app = TestApp::with_policy(policy);
    let id = app.register("saturated").await;

    let (status, body) = app.send(request(Method::GET, "/mining/passive", Some(id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["todayCoins"], 500);

    let (status, body) = app.send(request(Method::POST, "/claim/click", Some(id))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "MAX_DAILY_COINS");
    assert_eq!(body["message"], "Maximum daily coin limit reached");

    let (_, user) = app.send(request(Method::GET, "/user", Some(id))).await;
    assert_eq!(user["clicksToday"], 0);
    assert_eq!(user["clickCoins"], 0);
    assert_eq!(user["totalCoins"], 500);

    let (_, activities) = app
        .send(request(Method::GET, "/mining/activities", Some(id)))
        .await;
    let activities = activities.as_array().unwrap();
    assert_eq!(activities.len(), 1);
    assert_eq!(activities[0]["type"], "PASSIVE");
}

#[tokio::test]
async fn test_passive_grant_then_pending() {
    let app = TestApp::new();
    let id = app.register("idler").await;

    let (status, body) = app.send(request(Method::GET, "/mining/passive", Some(id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reward"], 500);
    assert!(body["nextRewardTime"].is_string());
    assert_eq!(body["user"]["passiveCoins"], 500);

    let (status, body) = app.send(request(Method::GET, "/mining/passive", Some(id))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("reward").is_none());
    let remaining = body["timeRemainingSeconds"].as_i64().unwrap();
    assert!(remaining > 3500 && remaining <= 3600);
}

#[tokio::test]
async fn test_passive_blocked_by_cap() {
    let policy = RewardPolicy {
        max_coins_per_day: 100,
        ..RewardPolicy::default()
    };
    let app = TestApp::with_policy(policy);
    let id = app.register("capped").await;

    let (status, body) = app.send(request(Method::GET, "/mining/passive", Some(id))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["nextRewardTime"].is_null());
    assert_eq!(body["message"], "Maximum daily coin limit reached");
    assert_eq!(body["user"]["totalCoins"], 0);
}

#[tokio::test]
async fn test_reset_day_same_day_is_noop() {
    let app = TestApp::new();
    let id = app.register("resetter").await;
    let (status, body) = app
        .send(request(Method::POST, "/mining/reset-day", Some(id)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reset"], false);
    assert_eq!(body["user"]["id"], id);
}

#[tokio::test]
async fn test_wallet_update_validation() {
    let app = TestApp::new();
    let id = app.register("holder").await;

    let (status, body) = app
        .send(json_request(Method::PUT, "/user/wallet", Some(id), json!({})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "MISSING_FIELD");

    let (status, body) = app
        .send(json_request(
            Method::PUT,
            "/user/wallet",
            Some(id),
            json!({ "walletAddress": "0x1234" }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_FORMAT");

    let address = "0x52908400098527886E0F7030069857D2E4169EE7";
    let (status, body) = app
        .send(json_request(
            Method::PUT,
            "/user/wallet",
            Some(id),
            json!({ "walletAddress": address }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["walletAddress"], address);

    let (_, activities) = app
        .send(request(Method::GET, "/mining/activities?limit=5", Some(id)))
        .await;
    assert_eq!(activities[0]["type"], "WALLET_CONNECTED");
    assert_eq!(activities[0]["amount"], 0);
}

#[tokio::test]
async fn test_coin_value_and_logo() {
    let app = TestApp::new();
    app.register("first").await;

    let (status, body) = app.send(request(Method::GET, "/coin/value", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "SmeraldoCoin");
    assert_eq!(body["totalUsers"], 1);
    assert_eq!(body["currentValue"], 0.00001);
    assert_eq!(body["nextTier"]["users"], 1000);
    assert_eq!(body["allTiers"].as_array().unwrap().len(), 7);

    let (status, body) = app.send(request(Method::GET, "/coin/logo", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["logoUrl"].as_str().unwrap().ends_with(".png"));
}

#[tokio::test]
async fn test_admin_routes_require_admin_role() {
    let app = TestApp::new();
    let user = app.register("admin").await;
    let admin = app.seed_admin();

    let (status, body) = app.send(request(Method::GET, "/admin/stats", Some(user))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    let (status, body) = app.send(request(Method::GET, "/admin/stats", Some(admin))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalUsers"], 2);
    assert_eq!(body["averageCoins"], 0);

    let (status, body) = app.send(request(Method::GET, "/admin/users", Some(admin))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_admin_export_csv() {
    let app = TestApp::new();
    let admin = app.seed_admin();
    app.register("miner").await;

    let response = app
        .router
        .clone()
        .oneshot(request(Method::GET, "/admin/export", Some(admin)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=users-export.csv"
    );

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let csv = String::from_utf8(bytes.to_vec()).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("Username,Wallet Address,Total Coins"));
    assert_eq!(lines.next(), Some("root,Not connected,0"));
    assert_eq!(lines.next(), Some("miner,Not connected,0"));
}
