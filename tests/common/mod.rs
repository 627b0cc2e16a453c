//! Shared helpers for the HTTP and WebSocket integration tests.

#![allow(dead_code, clippy::panic)]

use std::net::SocketAddr;
use std::time::Duration;

use campus_league::app_state::AppState;
use campus_league::build_app;
use campus_league::domain::EventBus;
use campus_league::persistence::Stores;
use serde_json::{Value, json};

/// A server bound to an ephemeral local port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    pub event_bus: EventBus,
}

impl TestServer {
    /// Starts a server over in-memory stores.
    pub async fn start() -> Self {
        Self::with_stores(Stores::in_memory()).await
    }

    /// Starts a server over the given stores.
    pub async fn with_stores(stores: Stores) -> Self {
        let event_bus = EventBus::new(256);
        let state = AppState::new(&stores, event_bus.clone());
        let app = build_app(state, Duration::from_secs(10));

        let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
            panic!("failed to bind test listener");
        };
        let Ok(addr) = listener.local_addr() else {
            panic!("listener has no local address");
        };
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            client: reqwest::Client::new(),
            event_bus,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    /// Sends a request and returns the status with the parsed JSON body
    /// (`Value::Null` for empty bodies).
    pub async fn call(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<Value>,
    ) -> (reqwest::StatusCode, Value) {
        let mut request = self.client.request(method, self.url(path));
        if let Some(body) = body {
            request = request.json(&body);
        }
        let Ok(response) = request.send().await else {
            panic!("request to {path} failed");
        };
        let status = response.status();
        let Ok(bytes) = response.bytes().await else {
            panic!("failed to read body of {path}");
        };
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    pub async fn get(&self, path: &str) -> (reqwest::StatusCode, Value) {
        self.call(reqwest::Method::GET, path, None).await
    }

    /// Registers a team and returns its id.
    pub async fn register_team(&self, name: &str, sport: &str) -> String {
        let (status, body) = self
            .call(
                reqwest::Method::POST,
                "/api/v1/teams",
                Some(json!({ "name": name, "sport": sport })),
            )
            .await;
        assert_eq!(status, reqwest::StatusCode::CREATED, "register {name}: {body}");
        let Some(id) = body["team_id"].as_str() else {
            panic!("team_id missing in {body}");
        };
        id.to_string()
    }

    /// Records a result and returns the response.
    pub async fn record(
        &self,
        home: &str,
        away: &str,
        home_goals: u32,
        away_goals: u32,
    ) -> (reqwest::StatusCode, Value) {
        self.call(
            reqwest::Method::POST,
            "/api/v1/results",
            Some(json!({
                "sport": "football",
                "home_team_id": home,
                "away_team_id": away,
                "home_goals": home_goals,
                "away_goals": away_goals,
            })),
        )
        .await
    }

    /// Returns `(points, wins, draws, losses)` of a team.
    pub async fn record_of(&self, team_id: &str) -> (i64, i64, i64, i64) {
        let (status, body) = self.get(&format!("/api/v1/teams/{team_id}")).await;
        assert_eq!(status, reqwest::StatusCode::OK, "get team: {body}");
        let field = |name: &str| body[name].as_i64().unwrap_or(i64::MIN);
        (
            field("points"),
            field("wins"),
            field("draws"),
            field("losses"),
        )
    }
}
