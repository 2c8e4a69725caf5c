//! Routes and the navigation guard
//!
//! The guard runs before every navigation. In order it:
//! 1. redirects the empty root to the scenario index
//! 2. starts a background load when no scenarios are loaded yet
//! 3. seeds the selection from the `uuid` parameter on first entry
//! 4. redirects views that need a selection when none is set
//! 5. redirects unmatched paths to the index

use crate::error::SessionError;
use crate::session::ScenarioSession;
use scenario_model::ScenarioUuid;
use std::collections::HashMap;
use std::fmt;
use tokio::task::JoinHandle;

/// Path every redirect leads to
pub const INDEX_PATH: &str = "/scenarios/index";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteName {
    ScenarioIndex,
    NewScenario,
    ScenarioOverview,
    ScenarioDesigner,
    InjectTester,
}

impl RouteName {
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::ScenarioIndex => "Scenario Index",
            Self::NewScenario => "New Scenario",
            Self::ScenarioOverview => "Scenario Overview",
            Self::ScenarioDesigner => "Scenario Designer",
            Self::InjectTester => "Inject Tester",
        }
    }

    #[must_use]
    pub fn pattern(self) -> &'static str {
        match self {
            Self::ScenarioIndex => "/scenarios/index",
            Self::NewScenario => "/scenarios/add",
            Self::ScenarioOverview => "/scenarios/overview/:uuid?",
            Self::ScenarioDesigner => "/scenarios/designer/:uuid?",
            Self::InjectTester => "/injects/tester/:inject_evaluation?",
        }
    }

    /// Whether the view edits the selected scenario
    #[must_use]
    pub fn requires_selection(self) -> bool {
        matches!(self, Self::ScenarioOverview | Self::ScenarioDesigner)
    }
}

impl fmt::Display for RouteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Every route, in matching order
pub const ROUTES: [RouteName; 5] = [
    RouteName::ScenarioIndex,
    RouteName::NewScenario,
    RouteName::ScenarioOverview,
    RouteName::ScenarioDesigner,
    RouteName::InjectTester,
];

/// A path resolved against [`ROUTES`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub name: RouteName,
    pub path: String,
    pub params: HashMap<String, String>,
}

impl RouteMatch {
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

fn segments(path: &str) -> Vec<&str> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn match_pattern(pattern: &str, path: &[&str]) -> Option<HashMap<String, String>> {
    let pattern = segments(pattern);
    if path.len() > pattern.len() {
        return None;
    }

    let mut params = HashMap::new();
    for (i, part) in pattern.iter().enumerate() {
        let value = path.get(i);
        match part.strip_prefix(':') {
            Some(param) => {
                let (name, optional) = match param.strip_suffix('?') {
                    Some(name) => (name, true),
                    None => (param, false),
                };
                match value {
                    Some(value) => {
                        params.insert(name.to_string(), (*value).to_string());
                    }
                    None if optional => {}
                    None => return None,
                }
            }
            None if value == Some(part) => {}
            None => return None,
        }
    }
    Some(params)
}

/// Resolve a path to its route
#[must_use]
pub fn match_route(path: &str) -> Option<RouteMatch> {
    let parts = segments(path);
    ROUTES.iter().find_map(|&name| {
        match_pattern(name.pattern(), &parts).map(|params| RouteMatch {
            name,
            path: path.to_string(),
            params,
        })
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    /// `/` or the empty path
    Root,
    /// View needs a selected scenario and none is set
    SelectionRequired,
    /// No route matches the path
    Unmatched,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Proceed(RouteMatch),
    Redirect { to: String, reason: RedirectReason },
}

impl Navigation {
    fn to_index(reason: RedirectReason) -> Self {
        Self::Redirect {
            to: INDEX_PATH.to_string(),
            reason,
        }
    }

    /// Path the navigation ends up on
    #[must_use]
    pub fn target(&self) -> &str {
        match self {
            Self::Proceed(route) => &route.path,
            Self::Redirect { to, .. } => to,
        }
    }
}

/// Decision plus the background load the guard may have started
#[derive(Debug)]
#[must_use = "await the reload handle or drop it deliberately to detach"]
pub struct GuardOutcome {
    pub navigation: Navigation,
    /// Resolves to the number of scenarios loaded
    pub reload: Option<JoinHandle<Result<usize, SessionError>>>,
}

/// Guard run before every navigation
#[derive(Debug, Clone)]
pub struct NavigationGuard {
    session: ScenarioSession,
}

impl NavigationGuard {
    #[must_use]
    pub fn new(session: ScenarioSession) -> Self {
        Self { session }
    }

    /// Decide where a navigation from `from` to `to` ends up
    ///
    /// `from` is `None` on the first navigation. The decision never waits
    /// for the background load.
    pub fn before_each(&self, to: &str, from: Option<&RouteMatch>) -> GuardOutcome {
        if segments(to).is_empty() {
            tracing::debug!(to, "redirecting root to index");
            return GuardOutcome {
                navigation: Navigation::to_index(RedirectReason::Root),
                reload: None,
            };
        }

        let store = self.session.store();
        let reload = if store.has_scenarios() {
            None
        } else {
            self.spawn_reload()
        };

        let navigation = match match_route(to) {
            Some(route) => {
                if from.is_none() && route.name.requires_selection() {
                    if let Some(uuid) = route.param("uuid") {
                        store.select_scenario(ScenarioUuid::new(uuid));
                    }
                }
                if route.name.requires_selection() && store.selected_uuid().is_none() {
                    tracing::debug!(to, route = %route.name, "no scenario selected, redirecting");
                    Navigation::to_index(RedirectReason::SelectionRequired)
                } else {
                    Navigation::Proceed(route)
                }
            }
            None => {
                tracing::debug!(to, "unknown route, redirecting");
                Navigation::to_index(RedirectReason::Unmatched)
            }
        };

        GuardOutcome { navigation, reload }
    }

    fn spawn_reload(&self) -> Option<JoinHandle<Result<usize, SessionError>>> {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("no async runtime, skipping background scenario load");
            return None;
        };
        let session = self.session.clone();
        Some(runtime.spawn(async move {
            let result = session.fetch_scenarios().await;
            if let Err(err) = &result {
                tracing::warn!(error = %err, "background scenario load failed");
            }
            result
        }))
    }
}
