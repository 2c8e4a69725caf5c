//! Testing utilities for the scenario editor workspace
//!
//! Shared fixtures and a scripted transport that answers from canned
//! responses and records every request it sees.

#![allow(missing_docs)]

use parking_lot::Mutex;
use scenario_client::{ApiClient, ApiError, ApiRequest, ApiResponse, Method, Transport};
use scenario_model::{Inject, InjectFlow, Scenario, ScenarioUuid};
use scenario_store::ScenarioStore;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

/// Base URL the scripted transport pretends to serve
pub const TEST_BASE_URL: &str = "http://scenarios.test";

pub fn scenario(uuid: &str) -> Scenario {
    Scenario::with_uuid(uuid)
}

/// Scenario with one inject and one flow record per identifier
pub fn scenario_with_injects(uuid: &str, injects: &[&str]) -> Scenario {
    let mut scenario = Scenario::with_uuid(uuid);
    for inject in injects {
        scenario.injects.push(Inject::with_uuid(*inject));
        scenario.inject_flow.push(InjectFlow::new(*inject));
    }
    scenario
}

/// Store loaded with `scenarios`, optionally selecting one of them
pub fn store_with(scenarios: Vec<Scenario>, selected: Option<&str>) -> Arc<ScenarioStore> {
    let store = ScenarioStore::with_scenarios(scenarios);
    store.select_scenario(selected.map(ScenarioUuid::new));
    Arc::new(store)
}

/// Body of `/scenarios/index` for the given scenarios
pub fn index_body(scenarios: &[Scenario]) -> Value {
    let by_uuid: serde_json::Map<String, Value> = scenarios
        .iter()
        .map(|s| (s.uuid().to_string(), json!(s)))
        .collect();
    json!({
        "scenarios": scenarios,
        "scenario_by_uuid": by_uuid,
        "read_errors": {},
    })
}

pub fn accepted(title: &str, message: &str) -> Value {
    json!({"success": true, "title": title, "message": message, "data": null})
}

pub fn rejected(title: &str, message: &str) -> Value {
    json!({"success": false, "title": title, "message": message, "data": null})
}

#[derive(Debug, Clone)]
enum Scripted {
    Respond {
        response: ApiResponse,
        delay: Option<Duration>,
    },
    NetworkError(String),
}

/// Transport answering from per-route queues
///
/// Each route keeps a queue of responses; the last one repeats once the
/// others are used up. Unscripted routes answer 404.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<(Method, String), VecDeque<Scripted>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn push(&self, method: Method, path: &str, scripted: Scripted) -> &Self {
        self.routes
            .lock()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(scripted);
        self
    }

    /// Answer `method path` with `status` and a JSON body
    pub fn on(&self, method: Method, path: &str, status: u16, body: &Value) -> &Self {
        let response = ApiResponse::new(status, body.to_string());
        self.push(method, path, Scripted::Respond { response, delay: None })
    }

    /// Answer `method path` with 200 and a JSON body
    pub fn on_json(&self, method: Method, path: &str, body: &Value) -> &Self {
        self.on(method, path, 200, body)
    }

    /// Like [`on_json`](Self::on_json), but only after `delay`
    pub fn on_delayed(&self, method: Method, path: &str, body: &Value, delay: Duration) -> &Self {
        let response = ApiResponse::json(body);
        self.push(
            method,
            path,
            Scripted::Respond {
                response,
                delay: Some(delay),
            },
        )
    }

    /// Fail `method path` at the connection level
    pub fn on_network_error(&self, method: Method, path: &str, message: &str) -> &Self {
        self.push(method, path, Scripted::NetworkError(message.to_string()))
    }

    /// Every request seen so far, in arrival order
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().clone()
    }

    /// Requests whose path equals `path`
    pub fn requests_to(&self, path: &str) -> Vec<ApiRequest> {
        let url = format!("{TEST_BASE_URL}{path}");
        self.requests
            .lock()
            .iter()
            .filter(|r| r.url == url)
            .cloned()
            .collect()
    }

    /// Client pointed at this transport
    pub fn client(self: &Arc<Self>) -> ApiClient {
        ApiClient::with_transport(TEST_BASE_URL, Arc::clone(self) as Arc<dyn Transport>)
    }

    fn next(&self, method: Method, path: &str) -> Option<Scripted> {
        let mut routes = self.routes.lock();
        let queue = routes.get_mut(&(method, path.to_string()))?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait::async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let path = request
            .url
            .strip_prefix(TEST_BASE_URL)
            .unwrap_or(&request.url)
            .to_string();
        let method = request.method;
        self.requests.lock().push(request);

        match self.next(method, &path) {
            Some(Scripted::Respond { response, delay }) => {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                Ok(response)
            }
            Some(Scripted::NetworkError(message)) => Err(ApiError::Network(message)),
            None => Ok(ApiResponse::new(404, "")),
        }
    }
}
