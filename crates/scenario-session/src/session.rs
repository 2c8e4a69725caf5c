//! Editing session
//!
//! Ties the API client to the shared store. Server writes are applied to
//! the store only after the server accepted them; any failure leaves the
//! store as it was.

use crate::error::SessionError;
use crate::toast::{Toast, ToastId, ToastQueue, ToastVariant};
use parking_lot::Mutex;
use scenario_client::{ApiClient, ServerReply, ViewOutcome, WriteOutcome};
use scenario_model::{
    ExercisePayload, Inject, InjectFlow, InjectUuid, Scenario, ScenarioIndex, ScenarioUuid,
};
use scenario_store::{inject_ops, ScenarioStore, StoreError};
use serde::Serialize;
use std::sync::Arc;

/// Shared editing session
///
/// Clones share the client, the store and the toast buffer.
#[derive(Debug, Clone)]
pub struct ScenarioSession {
    inner: Arc<SessionInner>,
}

#[derive(Debug)]
struct SessionInner {
    client: ApiClient,
    store: Arc<ScenarioStore>,
    toasts: Mutex<ToastQueue>,
}

impl ScenarioSession {
    /// Session with an empty store
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self::with_store(client, Arc::new(ScenarioStore::new()))
    }

    #[must_use]
    pub fn with_store(client: ApiClient, store: Arc<ScenarioStore>) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                client,
                store,
                toasts: Mutex::new(ToastQueue::default()),
            }),
        }
    }

    #[inline]
    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.inner.client
    }

    #[inline]
    #[must_use]
    pub fn store(&self) -> &Arc<ScenarioStore> {
        &self.inner.store
    }

    // --- Toasts ---

    pub fn toast(
        &self,
        variant: ToastVariant,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> ToastId {
        self.inner.toasts.lock().push(variant, title, message)
    }

    /// Toast reporting a server reply
    pub fn feedback(&self, reply: &ServerReply) -> ToastId {
        self.inner.toasts.lock().feedback(reply)
    }

    #[must_use]
    pub fn toasts(&self) -> Vec<Toast> {
        self.inner.toasts.lock().toasts()
    }

    pub fn remove_toast(&self, id: ToastId) -> bool {
        self.inner.toasts.lock().remove(id)
    }

    /// Remove and return every pending toast
    pub fn take_toasts(&self) -> Vec<Toast> {
        self.inner.toasts.lock().drain()
    }

    // --- Bulk sync ---

    /// Load the scenario list and replace the store
    ///
    /// Returns the number of scenarios loaded.
    pub async fn fetch_scenarios(&self) -> Result<usize, SessionError> {
        let index = self.inner.client.list_scenarios().await?;
        Ok(self.replace(index, "fetched"))
    }

    /// Ask the server to reread its files, then replace the store
    pub async fn force_reload(&self) -> Result<usize, SessionError> {
        let index = self.inner.client.reload_scenarios().await?;
        Ok(self.replace(index, "reloaded"))
    }

    fn replace(&self, index: ScenarioIndex, how: &'static str) -> usize {
        let count = index.scenarios.len();
        let read_errors = index.read_errors.len();
        self.inner.store.replace_index(index);
        tracing::info!(scenarios = count, read_errors, "{how} scenario list");
        count
    }

    // --- Scenario-level ---

    /// Fetch one scenario without storing it
    pub async fn view_scenario(&self, uuid: &ScenarioUuid) -> Result<ViewOutcome, SessionError> {
        Ok(self.inner.client.view_scenario(uuid).await?)
    }

    /// Create a scenario; reloads the list when accepted
    pub async fn add_scenario(&self, payload: &ExercisePayload) -> Result<WriteOutcome, SessionError> {
        let outcome = self.inner.client.add_scenario(payload).await?;
        self.after_scenario_write(&outcome).await;
        Ok(outcome)
    }

    /// Edit a scenario header; reloads the list when accepted
    pub async fn edit_scenario(&self, payload: &ExercisePayload) -> Result<WriteOutcome, SessionError> {
        let outcome = self.inner.client.edit_scenario(payload).await?;
        self.after_scenario_write(&outcome).await;
        Ok(outcome)
    }

    async fn after_scenario_write(&self, outcome: &WriteOutcome) {
        self.report(outcome);
        if !outcome.is_accepted() {
            return;
        }
        // The write already happened; a failed reload only leaves the list stale.
        if let Err(err) = self.force_reload().await {
            tracing::warn!(error = %err, "reload after scenario write failed");
            self.toast(ToastVariant::Danger, "Could not reload scenarios", err.to_string());
        }
    }

    /// Delete a scenario; removes it locally when accepted
    pub async fn delete_scenario(&self, uuid: &ScenarioUuid) -> Result<WriteOutcome, SessionError> {
        let outcome = self.inner.client.delete_scenario(uuid).await?;
        self.report(&outcome);
        if outcome.is_accepted() {
            self.inner.store.remove_scenario(uuid);
        }
        Ok(outcome)
    }

    // --- Inject-level, on the selected scenario ---

    /// Save an inject into the selected scenario; upserts locally when accepted
    pub async fn save_inject(
        &self,
        inject: Inject,
        flow: InjectFlow,
    ) -> Result<WriteOutcome, SessionError> {
        let target = self.selected()?;
        let outcome = self
            .inner
            .client
            .save_inject(&target, &inject, &flow)
            .await?;
        self.report(&outcome);
        if outcome.is_accepted() {
            self.apply_to(&target, |scenario| {
                inject_ops::upsert_inject(scenario, inject, flow);
            });
        }
        Ok(outcome)
    }

    /// Delete an inject from the selected scenario; removes it locally when accepted
    pub async fn remove_inject(&self, inject_uuid: &InjectUuid) -> Result<WriteOutcome, SessionError> {
        let target = self.selected()?;
        let outcome = self.inner.client.delete_inject(&target, inject_uuid).await?;
        self.report(&outcome);
        if outcome.is_accepted() {
            self.apply_to(&target, |scenario| {
                inject_ops::remove_inject(scenario, inject_uuid);
            });
        }
        Ok(outcome)
    }

    /// Store a new inject order for the selected scenario
    pub async fn reorder_injects(&self, order: &[InjectUuid]) -> Result<WriteOutcome, SessionError> {
        let target = self.selected()?;
        let outcome = self.inner.client.order_injects(&target, order).await?;
        self.report(&outcome);
        if outcome.is_accepted() {
            self.apply_to(&target, |scenario| inject_ops::reorder_injects(scenario, order));
        }
        Ok(outcome)
    }

    /// Run an inject evaluation on the server
    pub async fn test_inject<P: Serialize + ?Sized + Sync>(
        &self,
        payload: &P,
    ) -> Result<WriteOutcome, SessionError> {
        Ok(self.inner.client.test_inject(payload).await?)
    }

    /// Selected scenario identifier, if that scenario is loaded
    fn selected(&self) -> Result<ScenarioUuid, StoreError> {
        let store = &self.inner.store;
        let uuid = store.selected_uuid().ok_or(StoreError::NoSelection)?;
        if store.has_scenario() {
            Ok(uuid)
        } else {
            Err(StoreError::SelectionNotLoaded(uuid))
        }
    }

    /// Apply an accepted write locally if `target` is still selected
    fn apply_to(&self, target: &ScenarioUuid, apply: impl FnOnce(&mut Scenario)) {
        match self.inner.store.mutate_if_selected(target, apply) {
            Ok(()) => {}
            Err(err) if err.is_selection_changed() => tracing::warn!(
                scenario = %target,
                error = %err,
                "selection changed during write; local copy left for the next reload"
            ),
            Err(err) => {
                tracing::warn!(scenario = %target, error = %err, "could not apply accepted write locally");
            }
        }
    }

    fn report(&self, outcome: &WriteOutcome) {
        let reply = outcome.reply();
        if outcome.is_accepted() {
            tracing::info!(title = %reply.title, "server accepted write");
        } else {
            tracing::warn!(title = %reply.title, message = %reply.message, "server rejected write");
        }
        self.feedback(reply);
    }
}
