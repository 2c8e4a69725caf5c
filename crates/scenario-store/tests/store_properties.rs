use proptest::prelude::*;
use scenario_model::{Inject, InjectFlow, InjectUuid, Scenario, ScenarioUuid};
use scenario_store::{ScenarioStore, StoreError};
use serde_json::json;

fn scenario_a() -> Scenario {
    serde_json::from_value(json!({"exercise": {"uuid": "A"}, "injects": [], "inject_flow": []})).unwrap()
}

#[test]
fn test_add_inject_to_selected_scenario() {
    let store = ScenarioStore::with_scenarios(vec![scenario_a()]);
    store.select_scenario(ScenarioUuid::new("A"));

    store
        .add_inject(Inject::with_uuid("i1"), InjectFlow::new("i1"))
        .unwrap();

    let scenario = store.selected_scenario().unwrap();
    assert_eq!(scenario.injects, vec![Inject::with_uuid("i1")]);
    assert_eq!(scenario.inject_flow, vec![InjectFlow::new("i1")]);
}

#[test]
fn test_remove_inject_clears_requirement() {
    let store = ScenarioStore::with_scenarios(vec![scenario_a()]);
    store.select_scenario(ScenarioUuid::new("A"));
    store.add_inject(Inject::with_uuid("i1"), InjectFlow::new("i1")).unwrap();
    store
        .add_inject(Inject::with_uuid("i2"), InjectFlow::new("i2").requiring("i1"))
        .unwrap();

    store.remove_inject(&InjectUuid::new("i1")).unwrap();

    let scenario = store.selected_scenario().unwrap();
    assert_eq!(scenario.injects, vec![Inject::with_uuid("i2")]);
    assert_eq!(scenario.inject_flow.len(), 1);
    let requirements = serde_json::to_value(&scenario.inject_flow[0].requirements).unwrap();
    assert_eq!(requirements, json!({}));
}

#[test]
fn test_unknown_selection_does_not_fault() {
    let store = ScenarioStore::with_scenarios(vec![scenario_a()]);
    store.select_scenario(ScenarioUuid::new("missing"));

    assert!(!store.has_scenario());
    assert!(matches!(
        store.update_inject(&Inject::with_uuid("i1"), &InjectFlow::new("i1")),
        Err(StoreError::SelectionNotLoaded(_))
    ));
}

fn arb_uuid() -> impl Strategy<Value = String> {
    "[a-f0-9]{1,6}"
}

fn arb_scenarios() -> impl Strategy<Value = Vec<Scenario>> {
    prop::collection::hash_set(arb_uuid(), 0..12)
        .prop_map(|uuids| uuids.into_iter().map(|u| Scenario::with_uuid(u)).collect())
}

/// Scenario with injects `0..n` where each flow may require an earlier inject
fn arb_inject_graph() -> impl Strategy<Value = (usize, Vec<Option<usize>>)> {
    (1usize..10).prop_flat_map(|n| {
        let requirements = (0..n)
            .map(|i| {
                if i == 0 {
                    Just(None).boxed()
                } else {
                    prop::option::of(0..i).boxed()
                }
            })
            .collect::<Vec<_>>();
        (Just(n), requirements)
    })
}

fn build_graph(n: usize, requirements: &[Option<usize>]) -> ScenarioStore {
    let store = ScenarioStore::with_scenarios(vec![Scenario::with_uuid("A")]);
    store.select_scenario(ScenarioUuid::new("A"));
    for i in 0..n {
        let uuid = format!("i{i}");
        let mut flow = InjectFlow::new(uuid.as_str());
        if let Some(target) = requirements[i] {
            flow = flow.requiring(format!("i{target}"));
        }
        store.add_inject(Inject::with_uuid(uuid.as_str()), flow).unwrap();
    }
    store
}

proptest! {
    #[test]
    fn prop_has_scenarios_matches_length(scenarios in arb_scenarios()) {
        let store = ScenarioStore::new();
        let expected = !scenarios.is_empty();
        store.set_scenarios(scenarios, Vec::new());
        prop_assert_eq!(store.has_scenarios(), expected);
    }

    #[test]
    fn prop_lookup_is_order_independent(
        scenarios in arb_scenarios().prop_shuffle(),
    ) {
        let store = ScenarioStore::new();
        store.set_scenarios(scenarios.clone(), Vec::new());

        let lookup = store.scenario_by_uuid();
        prop_assert_eq!(lookup.len(), scenarios.len());
        for scenario in &scenarios {
            prop_assert_eq!(lookup.get(scenario.uuid()), Some(scenario));
            let found = store.scenario(scenario.uuid());
            prop_assert_eq!(found.as_ref(), Some(scenario));
        }
    }

    #[test]
    fn prop_remove_inject_is_idempotent(
        (n, requirements) in arb_inject_graph(),
        victim in 0usize..10,
    ) {
        let store = build_graph(n, &requirements);
        let victim = InjectUuid::new(format!("i{}", victim % n));

        store.remove_inject(&victim).unwrap();
        let after_first = store.selected_scenario().unwrap();

        let report = store.remove_inject(&victim).unwrap();
        prop_assert!(report.is_noop());
        prop_assert_eq!(store.selected_scenario().unwrap(), after_first);
    }

    #[test]
    fn prop_remove_inject_leaves_no_dangling_requirement(
        (n, requirements) in arb_inject_graph(),
        victim in 0usize..10,
    ) {
        let store = build_graph(n, &requirements);
        let before = store.selected_scenario().unwrap();
        let victim = InjectUuid::new(format!("i{}", victim % n));

        store.remove_inject(&victim).unwrap();
        let after = store.selected_scenario().unwrap();

        prop_assert!(!after.contains_inject(&victim));
        prop_assert!(after.flow(&victim).is_none());
        prop_assert!(after.integrity_report().is_consistent());

        // Flow records that did not point at the victim are untouched.
        for flow in &after.inject_flow {
            let original = before.flow(&flow.inject_uuid).unwrap();
            if original.requires(&victim) {
                prop_assert!(flow.requirements.is_empty());
            } else {
                prop_assert_eq!(flow, original);
            }
        }
    }
}
