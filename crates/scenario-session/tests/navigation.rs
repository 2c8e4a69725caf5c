use scenario_client::Method;
use scenario_model::ScenarioUuid;
use scenario_session::{
    match_route, Navigation, NavigationGuard, RedirectReason, RouteName, ScenarioSession, INDEX_PATH,
};
use scenario_test_utils::{index_body, scenario, store_with, ScriptedTransport};
use std::sync::Arc;

fn guard_with(
    scenarios: &[&str],
    selected: Option<&str>,
) -> (NavigationGuard, ScenarioSession, Arc<ScriptedTransport>) {
    let transport = ScriptedTransport::new();
    transport.on_json(
        Method::Get,
        "/scenarios/index",
        &index_body(&[scenario("A"), scenario("B")]),
    );
    let store = store_with(scenarios.iter().map(|u| scenario(u)).collect(), selected);
    let session = ScenarioSession::with_store(transport.client(), store);
    (NavigationGuard::new(session.clone()), session, transport)
}

fn redirect_reason(navigation: &Navigation) -> Option<RedirectReason> {
    match navigation {
        Navigation::Redirect { to, reason } => {
            assert_eq!(to, INDEX_PATH);
            Some(*reason)
        }
        Navigation::Proceed(_) => None,
    }
}

#[tokio::test]
async fn test_root_redirects_to_index() {
    let (guard, _, transport) = guard_with(&[], None);

    for path in ["/", ""] {
        let outcome = guard.before_each(path, None);
        assert_eq!(redirect_reason(&outcome.navigation), Some(RedirectReason::Root));
        assert!(outcome.reload.is_none());
    }
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_empty_store_triggers_background_load() {
    let (guard, session, _) = guard_with(&[], None);

    let outcome = guard.before_each("/scenarios/index", None);
    assert!(matches!(outcome.navigation, Navigation::Proceed(ref r) if r.name == RouteName::ScenarioIndex));

    let loaded = outcome.reload.expect("reload spawned").await.unwrap().unwrap();
    assert_eq!(loaded, 2);
    assert!(session.store().has_scenarios());
}

#[tokio::test]
async fn test_loaded_store_skips_background_load() {
    let (guard, _, transport) = guard_with(&["A"], None);

    let outcome = guard.before_each("/scenarios/add", None);
    assert!(outcome.reload.is_none());
    assert!(matches!(outcome.navigation, Navigation::Proceed(_)));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_first_entry_seeds_selection() {
    let (guard, session, _) = guard_with(&["A"], None);

    let outcome = guard.before_each("/scenarios/designer/A", None);

    assert!(matches!(outcome.navigation, Navigation::Proceed(ref r) if r.param("uuid") == Some("A")));
    assert_eq!(session.store().selected_uuid(), Some(ScenarioUuid::new("A")));
    assert!(session.store().has_scenario());
}

#[tokio::test]
async fn test_later_entry_does_not_seed_selection() {
    let (guard, session, _) = guard_with(&["A"], None);
    let from = match_route("/scenarios/index").unwrap();

    let outcome = guard.before_each("/scenarios/overview/A", Some(&from));

    assert_eq!(
        redirect_reason(&outcome.navigation),
        Some(RedirectReason::SelectionRequired)
    );
    assert_eq!(session.store().selected_uuid(), None);
}

#[tokio::test]
async fn test_selection_required_without_uuid() {
    let (guard, _, _) = guard_with(&["A"], None);

    let outcome = guard.before_each("/scenarios/overview", None);
    assert_eq!(
        redirect_reason(&outcome.navigation),
        Some(RedirectReason::SelectionRequired)
    );
}

#[tokio::test]
async fn test_dangling_selection_still_proceeds() {
    let (guard, _, _) = guard_with(&["A"], Some("gone"));
    let from = match_route("/scenarios/index").unwrap();

    let outcome = guard.before_each("/scenarios/designer", Some(&from));
    assert!(matches!(outcome.navigation, Navigation::Proceed(_)));
}

#[tokio::test]
async fn test_tester_needs_no_selection() {
    let (guard, _, _) = guard_with(&["A"], None);

    let outcome = guard.before_each("/injects/tester/query_mirror", None);
    match outcome.navigation {
        Navigation::Proceed(route) => {
            assert_eq!(route.name, RouteName::InjectTester);
            assert_eq!(route.param("inject_evaluation"), Some("query_mirror"));
        }
        other => panic!("expected to proceed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unknown_route_redirects_to_index() {
    let (guard, _, _) = guard_with(&["A"], None);

    let outcome = guard.before_each("/settings", None);
    assert_eq!(redirect_reason(&outcome.navigation), Some(RedirectReason::Unmatched));
    assert_eq!(outcome.navigation.target(), INDEX_PATH);
}

#[test]
fn test_guard_without_runtime_does_not_panic() {
    let (guard, _, _) = guard_with(&[], None);

    let outcome = guard.before_each("/scenarios/index", None);
    assert!(outcome.reload.is_none());
    assert!(matches!(outcome.navigation, Navigation::Proceed(_)));
}
