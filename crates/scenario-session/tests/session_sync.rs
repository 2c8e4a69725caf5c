use pretty_assertions::assert_eq;
use scenario_client::{ApiError, Method};
use scenario_model::{ExercisePayload, Inject, InjectFlow, InjectUuid, ScenarioUuid};
use scenario_session::{ScenarioSession, SessionError, ToastVariant};
use scenario_store::StoreError;
use scenario_test_utils::{
    accepted, index_body, rejected, scenario, scenario_with_injects, store_with, ScriptedTransport,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn session(transport: &Arc<ScriptedTransport>, selected: Option<&str>) -> ScenarioSession {
    let store = store_with(
        vec![scenario_with_injects("A", &["i1", "i2"]), scenario("B")],
        selected,
    );
    ScenarioSession::with_store(transport.client(), store)
}

fn inject_ids(session: &ScenarioSession) -> Vec<String> {
    session
        .store()
        .selected_scenario()
        .map(|s| s.injects.iter().map(|i| i.uuid.to_string()).collect())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_fetch_replaces_store() {
    let transport = ScriptedTransport::new();
    transport.on_json(
        Method::Get,
        "/scenarios/index",
        &json!({
            "scenarios": [{"exercise": {"uuid": "C"}}],
            "read_errors": {"bad.json": {"error": "Expecting value", "text": "{"}},
        }),
    );
    let session = session(&transport, None);

    assert_eq!(session.fetch_scenarios().await.unwrap(), 1);

    let store = session.store();
    assert_eq!(store.len(), 1);
    assert!(store.scenario(&ScenarioUuid::new("C")).is_some());
    assert_eq!(store.read_errors()[0].file, "bad.json");
}

#[tokio::test]
async fn test_fetch_tolerates_null_inject_uuid() {
    let transport = ScriptedTransport::new();
    transport.on_json(
        Method::Get,
        "/scenarios/index",
        &json!({
            "scenarios": [
                {"exercise": {"uuid": "A", "name": "Clean"}, "injects": [{"uuid": "i1"}]},
                {
                    "exercise": {"uuid": "B", "name": null},
                    "injects": [{"uuid": null, "name": "Draft"}],
                    "inject_flow": [{"inject_uuid": null, "requirements": null}],
                },
            ],
            "read_errors": {},
        }),
    );
    let session = session(&transport, None);

    assert_eq!(session.fetch_scenarios().await.unwrap(), 2);

    let store = session.store();
    assert_eq!(store.len(), 2);
    let b = store.scenario(&ScenarioUuid::new("B")).unwrap();
    assert!(b.injects[0].uuid.is_empty());
    assert_eq!(b.injects[0].name, "Draft");
}

#[tokio::test]
async fn test_force_reload_posts_without_body() {
    let transport = ScriptedTransport::new();
    transport.on_json(Method::Post, "/scenarios/reload", &index_body(&[scenario("Z")]));
    let session = session(&transport, None);

    session.force_reload().await.unwrap();

    let requests = transport.requests_to("/scenarios/reload");
    assert_eq!(requests.len(), 1);
    assert!(requests[0].body.is_none());
    assert_eq!(session.store().len(), 1);
}

#[tokio::test]
async fn test_delete_scenario_server_error_leaves_store() {
    let transport = ScriptedTransport::new();
    transport.on(Method::Post, "/scenarios/delete/A", 500, &json!({"success": true}));
    let session = session(&transport, Some("A"));
    let before = session.store().scenarios();

    let err = session
        .delete_scenario(&ScenarioUuid::new("A"))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert_eq!(session.store().scenarios(), before);
    assert!(session.toasts().is_empty());
}

#[tokio::test]
async fn test_delete_scenario_accepted_removes_locally() {
    let transport = ScriptedTransport::new();
    transport.on_json(
        Method::Post,
        "/scenarios/delete/A",
        &accepted("Scenario deleted", "Scenario A deleted"),
    );
    let session = session(&transport, None);

    let outcome = session.delete_scenario(&ScenarioUuid::new("A")).await.unwrap();

    assert!(outcome.is_accepted());
    assert_eq!(session.store().len(), 1);
    assert!(session.store().scenario(&ScenarioUuid::new("A")).is_none());

    let toasts = session.take_toasts();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].variant, ToastVariant::Success);
    assert_eq!(toasts[0].title, "Scenario deleted");
}

#[tokio::test]
async fn test_delete_scenario_rejected_keeps_scenario() {
    let transport = ScriptedTransport::new();
    transport.on_json(
        Method::Post,
        "/scenarios/delete/A",
        &rejected("Could not delete scenario", "permission denied"),
    );
    let session = session(&transport, None);

    let outcome = session.delete_scenario(&ScenarioUuid::new("A")).await.unwrap();

    assert!(!outcome.is_accepted());
    assert_eq!(session.store().len(), 2);
    let toasts = session.toasts();
    assert_eq!(toasts[0].variant, ToastVariant::Danger);
    assert_eq!(toasts[0].message, "permission denied");
}

#[tokio::test]
async fn test_save_inject_upserts_when_accepted() {
    let transport = ScriptedTransport::new();
    transport.on_json(
        Method::Post,
        "/scenarios/save-inject/A",
        &accepted("Inject saved", ""),
    );
    let session = session(&transport, Some("A"));

    session
        .save_inject(Inject::with_uuid("i3"), InjectFlow::new("i3").requiring("i1"))
        .await
        .unwrap();
    session
        .save_inject(Inject::new("i1", "Renamed", "notify"), InjectFlow::new("i1"))
        .await
        .unwrap();

    assert_eq!(inject_ids(&session), ["i1", "i2", "i3"]);
    let scenario = session.store().selected_scenario().unwrap();
    assert_eq!(scenario.injects[0].name, "Renamed");
    assert!(scenario.inject_flow[2].requires(&InjectUuid::new("i1")));

    let body = transport.requests_to("/scenarios/save-inject/A")[0]
        .body
        .clone()
        .unwrap();
    assert_eq!(body["injectFlow"]["requirements"]["inject_uuid"], json!("i1"));
}

#[tokio::test]
async fn test_save_inject_rejected_leaves_store() {
    let transport = ScriptedTransport::new();
    transport.on_json(
        Method::Post,
        "/scenarios/save-inject/A",
        &rejected("Could not save inject", "invalid target tool"),
    );
    let session = session(&transport, Some("A"));

    let outcome = session
        .save_inject(Inject::with_uuid("i3"), InjectFlow::new("i3"))
        .await
        .unwrap();

    assert!(!outcome.is_accepted());
    assert_eq!(inject_ids(&session), ["i1", "i2"]);
}

#[tokio::test]
async fn test_inject_writes_need_a_loaded_selection() {
    let transport = ScriptedTransport::new();

    let unselected = session(&transport, None);
    let err = unselected
        .remove_inject(&InjectUuid::new("i1"))
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::Store(StoreError::NoSelection)));

    let dangling = session(&transport, Some("missing"));
    let err = dangling
        .save_inject(Inject::with_uuid("i9"), InjectFlow::new("i9"))
        .await
        .unwrap_err();
    assert!(err.is_local());

    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_remove_inject_clears_requirements_when_accepted() {
    let transport = ScriptedTransport::new();
    transport.on_json(
        Method::Post,
        "/scenarios/delete-inject/A/i1",
        &accepted("Inject deleted", ""),
    );
    let store = store_with(vec![scenario_with_injects("A", &["i1", "i2"])], Some("A"));
    store
        .update_inject(&Inject::with_uuid("i2"), &InjectFlow::new("i2").requiring("i1"))
        .unwrap();
    let session = ScenarioSession::with_store(transport.client(), store);

    session.remove_inject(&InjectUuid::new("i1")).await.unwrap();

    let scenario = session.store().selected_scenario().unwrap();
    assert_eq!(inject_ids(&session), ["i2"]);
    assert!(scenario.inject_flow[0].requirements.is_empty());
    assert_eq!(
        transport.requests_to("/scenarios/delete-inject/A/i1")[0].body,
        Some(json!({}))
    );
}

#[tokio::test]
async fn test_reorder_injects_when_accepted() {
    let transport = ScriptedTransport::new();
    transport.on_json(
        Method::Post,
        "/scenarios/order-inject/A",
        &accepted("Order saved", ""),
    );
    let session = session(&transport, Some("A"));

    let order = [InjectUuid::new("i2"), InjectUuid::new("i1")];
    session.reorder_injects(&order).await.unwrap();

    assert_eq!(inject_ids(&session), ["i2", "i1"]);
    let flows: Vec<String> = session
        .store()
        .selected_scenario()
        .unwrap()
        .inject_flow
        .iter()
        .map(|f| f.inject_uuid.to_string())
        .collect();
    assert_eq!(flows, ["i2", "i1"]);
}

#[tokio::test]
async fn test_add_scenario_reloads_list() {
    let transport = ScriptedTransport::new();
    transport
        .on_json(Method::Post, "/scenarios/add", &accepted("Scenario created", ""))
        .on_json(
            Method::Post,
            "/scenarios/reload",
            &index_body(&[scenario("A"), scenario("B"), scenario("N")]),
        );
    let session = session(&transport, None);

    let outcome = session
        .add_scenario(&ExercisePayload::new("New drill", "training"))
        .await
        .unwrap();

    assert!(outcome.is_accepted());
    assert_eq!(session.store().len(), 3);
    assert_eq!(transport.requests_to("/scenarios/reload").len(), 1);
}

#[tokio::test]
async fn test_rejected_edit_does_not_reload() {
    let transport = ScriptedTransport::new();
    transport.on_json(
        Method::Post,
        "/scenarios/edit",
        &rejected("Could not save scenario", "missing name"),
    );
    let session = session(&transport, None);

    let outcome = session
        .edit_scenario(&ExercisePayload::new("", "training"))
        .await
        .unwrap();

    assert!(!outcome.is_accepted());
    assert!(transport.requests_to("/scenarios/reload").is_empty());
}

#[tokio::test]
async fn test_failed_reload_after_add_is_reported_as_toast() {
    let transport = ScriptedTransport::new();
    transport
        .on_json(Method::Post, "/scenarios/add", &accepted("Scenario created", ""))
        .on_network_error(Method::Post, "/scenarios/reload", "connection reset");
    let session = session(&transport, None);

    let outcome = session
        .add_scenario(&ExercisePayload::new("New drill", "training"))
        .await
        .unwrap();

    assert!(outcome.is_accepted());
    let variants: Vec<ToastVariant> = session.toasts().iter().map(|t| t.variant).collect();
    assert_eq!(variants, [ToastVariant::Success, ToastVariant::Danger]);
    assert_eq!(session.store().len(), 2);
}

#[tokio::test]
async fn test_selection_change_during_save_skips_local_update() {
    let transport = ScriptedTransport::new();
    transport.on_delayed(
        Method::Post,
        "/scenarios/save-inject/A",
        &accepted("Inject saved", ""),
        Duration::from_millis(50),
    );
    let session = session(&transport, Some("A"));

    let pending = {
        let session = session.clone();
        tokio::spawn(async move {
            session
                .save_inject(Inject::with_uuid("i3"), InjectFlow::new("i3"))
                .await
        })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;
    session.store().select_scenario(ScenarioUuid::new("B"));

    let outcome = pending.await.unwrap().unwrap();
    assert!(outcome.is_accepted());

    let a = session.store().scenario(&ScenarioUuid::new("A")).unwrap();
    assert_eq!(a.injects.len(), 2);
    let b = session.store().scenario(&ScenarioUuid::new("B")).unwrap();
    assert!(b.injects.is_empty());
}

#[tokio::test]
async fn test_cleared_selection_during_remove_keeps_inject() {
    let transport = ScriptedTransport::new();
    transport.on_delayed(
        Method::Post,
        "/scenarios/delete-inject/A/i1",
        &accepted("Inject deleted", ""),
        Duration::from_millis(50),
    );
    let session = session(&transport, Some("A"));

    let pending = {
        let session = session.clone();
        tokio::spawn(async move { session.remove_inject(&InjectUuid::new("i1")).await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;
    session.store().select_scenario(None);

    assert!(pending.await.unwrap().unwrap().is_accepted());

    session.store().select_scenario(ScenarioUuid::new("A"));
    assert_eq!(inject_ids(&session), ["i1", "i2"]);
}

#[tokio::test]
async fn test_network_failure_is_reported_to_caller() {
    let transport = ScriptedTransport::new();
    transport.on_network_error(Method::Get, "/scenarios/index", "connection refused");
    let session = session(&transport, None);

    let err = session.fetch_scenarios().await.unwrap_err();
    assert!(matches!(err, SessionError::Api(ApiError::Network(_))));
    assert_eq!(session.store().len(), 2);
}

#[tokio::test]
async fn test_inject_test_passes_result_through() {
    let transport = ScriptedTransport::new();
    transport.on_json(
        Method::Post,
        "/injects/test",
        &json!({"success": true, "data": {"outcome": 1, "debug": ["matched"]}}),
    );
    let session = session(&transport, None);

    let payload = scenario_model::InjectTestPayload::new(
        "MISP",
        scenario_model::EvaluationStrategy::DataFiltering,
    );
    let outcome = session.test_inject(&payload).await.unwrap();
    let result: scenario_model::InjectTestResult = outcome.reply().data_as().unwrap();

    assert_eq!(result.outcome, scenario_model::EvalOutcome::Success);
    assert!(session.toasts().is_empty());
}
