//! API client
//!
//! One method per server endpoint. Reads return typed documents, writes
//! return a [`WriteOutcome`] the caller has to inspect. Nothing here touches
//! local state; synchronizing the store is the session's job.

use crate::config::ClientConfig;
use crate::endpoint::Endpoint;
use crate::error::ApiError;
use crate::reply::{ViewOutcome, WriteOutcome};
use crate::transport::{ApiRequest, ReqwestTransport, Transport};
use scenario_model::{
    EmptyPayload, ExercisePayload, Inject, InjectFlow, InjectOrderPayload, InjectUuid,
    SaveInjectPayload, ScenarioIndex, ScenarioUuid,
};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Client for the scenario server
///
/// Cheap to clone; clones share the transport.
#[derive(Clone)]
pub struct ApiClient {
    base_url: Arc<str>,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Client using the reqwest transport
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::with_timeout(config.timeout())?;
        Ok(Self::with_transport(config.resolved_base_url(), Arc::new(transport)))
    }

    /// Client using a caller-supplied transport
    #[must_use]
    pub fn with_transport(base_url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: Arc::from(base_url.trim_end_matches('/')),
            transport,
        }
    }

    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of an endpoint
    #[must_use]
    pub fn url_for(&self, endpoint: &Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    /// Call an endpoint and parse the JSON body
    ///
    /// Non-2xx statuses fail with [`ApiError::Transport`] without looking at
    /// the body.
    pub async fn request_json(
        &self,
        endpoint: &Endpoint,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        let mut request = ApiRequest::new(endpoint.method(), self.url_for(endpoint));
        if let Some(body) = body {
            request = request.with_body(body);
        }

        tracing::debug!(
            endpoint = endpoint.name(),
            method = %request.method,
            url = %request.url,
            "sending request"
        );

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(endpoint = endpoint.name(), error = %err, "request failed");
                return Err(err);
            }
        };

        if !response.is_success() {
            tracing::warn!(
                endpoint = endpoint.name(),
                status = response.status,
                "request returned failure status"
            );
            return Err(ApiError::Transport {
                status: response.status,
            });
        }

        serde_json::from_slice(&response.body).map_err(|err| {
            tracing::warn!(endpoint = endpoint.name(), error = %err, "malformed response body");
            ApiError::Malformed(err)
        })
    }

    async fn write(&self, endpoint: &Endpoint, body: Option<Value>) -> Result<WriteOutcome, ApiError> {
        let outcome = WriteOutcome::from_value(self.request_json(endpoint, body).await?)?;
        if !outcome.is_accepted() {
            tracing::debug!(
                endpoint = endpoint.name(),
                title = %outcome.reply().title,
                "write rejected by server"
            );
        }
        Ok(outcome)
    }

    async fn write_with<P: Serialize + ?Sized>(
        &self,
        endpoint: &Endpoint,
        payload: &P,
    ) -> Result<WriteOutcome, ApiError> {
        let body = serde_json::to_value(payload)?;
        self.write(endpoint, Some(body)).await
    }

    async fn index(&self, endpoint: &Endpoint) -> Result<ScenarioIndex, ApiError> {
        let value = self.request_json(endpoint, None).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// `GET /scenarios/index`
    pub async fn list_scenarios(&self) -> Result<ScenarioIndex, ApiError> {
        self.index(&Endpoint::ScenariosIndex).await
    }

    /// `POST /scenarios/reload`: server rereads its scenario directory
    pub async fn reload_scenarios(&self) -> Result<ScenarioIndex, ApiError> {
        self.index(&Endpoint::ScenariosReload).await
    }

    /// `GET /scenarios/view/{uuid}`
    pub async fn view_scenario(&self, uuid: &ScenarioUuid) -> Result<ViewOutcome, ApiError> {
        let value = self
            .request_json(&Endpoint::ScenariosView(uuid.clone()), None)
            .await?;
        ViewOutcome::from_value(value)
    }

    /// `POST /scenarios/add`
    pub async fn add_scenario(&self, payload: &ExercisePayload) -> Result<WriteOutcome, ApiError> {
        self.write_with(&Endpoint::ScenariosAdd, payload).await
    }

    /// `POST /scenarios/edit`
    pub async fn edit_scenario(&self, payload: &ExercisePayload) -> Result<WriteOutcome, ApiError> {
        self.write_with(&Endpoint::ScenariosEdit, payload).await
    }

    /// `POST /scenarios/delete/{uuid}` (no body)
    pub async fn delete_scenario(&self, uuid: &ScenarioUuid) -> Result<WriteOutcome, ApiError> {
        self.write(&Endpoint::ScenariosDelete(uuid.clone()), None).await
    }

    /// `POST /scenarios/save-inject/{scenario_uuid}`
    pub async fn save_inject(
        &self,
        scenario_uuid: &ScenarioUuid,
        inject: &Inject,
        flow: &InjectFlow,
    ) -> Result<WriteOutcome, ApiError> {
        let payload = SaveInjectPayload {
            inject: inject.clone(),
            inject_flow: flow.clone(),
        };
        self.write_with(&Endpoint::InjectSave(scenario_uuid.clone()), &payload)
            .await
    }

    /// `POST /scenarios/delete-inject/{scenario_uuid}/{inject_uuid}`
    pub async fn delete_inject(
        &self,
        scenario_uuid: &ScenarioUuid,
        inject_uuid: &InjectUuid,
    ) -> Result<WriteOutcome, ApiError> {
        let endpoint = Endpoint::InjectDelete(scenario_uuid.clone(), inject_uuid.clone());
        self.write_with(&endpoint, &EmptyPayload {}).await
    }

    /// `POST /scenarios/order-inject/{scenario_uuid}`
    pub async fn order_injects(
        &self,
        scenario_uuid: &ScenarioUuid,
        order: &[InjectUuid],
    ) -> Result<WriteOutcome, ApiError> {
        let payload = InjectOrderPayload {
            inject_uuids: order.to_vec(),
        };
        self.write_with(&Endpoint::InjectOrder(scenario_uuid.clone()), &payload)
            .await
    }

    /// `POST /injects/test`
    ///
    /// Accepts any serializable payload; [`scenario_model::InjectTestPayload`]
    /// covers the fields the server knows.
    pub async fn test_inject<P: Serialize + ?Sized + Sync>(
        &self,
        payload: &P,
    ) -> Result<WriteOutcome, ApiError> {
        self.write_with(&Endpoint::InjectTest, payload).await
    }
}
