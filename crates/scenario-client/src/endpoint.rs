//! Named server endpoints
//!
//! Each logical operation maps to one fixed path, optionally suffixed with
//! path parameters appended verbatim as extra segments.

use crate::transport::Method;
use scenario_model::{InjectUuid, ScenarioUuid};

/// One server endpoint together with its path parameters
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `GET /scenarios/index`
    ScenariosIndex,
    /// `POST /scenarios/reload`
    ScenariosReload,
    /// `GET /scenarios/view/{uuid}`
    ScenariosView(ScenarioUuid),
    /// `POST /scenarios/add`
    ScenariosAdd,
    /// `POST /scenarios/edit`
    ScenariosEdit,
    /// `POST /scenarios/delete/{uuid}`
    ScenariosDelete(ScenarioUuid),
    /// `POST /scenarios/save-inject/{scenario_uuid}`
    InjectSave(ScenarioUuid),
    /// `POST /scenarios/delete-inject/{scenario_uuid}/{inject_uuid}`
    InjectDelete(ScenarioUuid, InjectUuid),
    /// `POST /scenarios/order-inject/{scenario_uuid}`
    InjectOrder(ScenarioUuid),
    /// `POST /injects/test`
    InjectTest,
}

impl Endpoint {
    /// Stable name used in logs
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::ScenariosIndex => "scenarios.index",
            Self::ScenariosReload => "scenarios.reload",
            Self::ScenariosView(_) => "scenarios.view",
            Self::ScenariosAdd => "scenarios.add",
            Self::ScenariosEdit => "scenarios.edit",
            Self::ScenariosDelete(_) => "scenarios.delete",
            Self::InjectSave(_) => "inject.save",
            Self::InjectDelete(..) => "inject.delete",
            Self::InjectOrder(_) => "inject.order",
            Self::InjectTest => "inject.test",
        }
    }

    /// Fixed path without parameters
    #[must_use]
    pub fn base_path(&self) -> &'static str {
        match self {
            Self::ScenariosIndex => "/scenarios/index",
            Self::ScenariosReload => "/scenarios/reload",
            Self::ScenariosView(_) => "/scenarios/view",
            Self::ScenariosAdd => "/scenarios/add",
            Self::ScenariosEdit => "/scenarios/edit",
            Self::ScenariosDelete(_) => "/scenarios/delete",
            Self::InjectSave(_) => "/scenarios/save-inject",
            Self::InjectDelete(..) => "/scenarios/delete-inject",
            Self::InjectOrder(_) => "/scenarios/order-inject",
            Self::InjectTest => "/injects/test",
        }
    }

    /// HTTP method: GET for reads, POST for everything else
    #[inline]
    #[must_use]
    pub fn method(&self) -> Method {
        match self {
            Self::ScenariosIndex | Self::ScenariosView(_) => Method::Get,
            _ => Method::Post,
        }
    }

    /// Check if the endpoint changes server state
    #[inline]
    #[must_use]
    pub fn is_write(&self) -> bool {
        !matches!(
            self,
            Self::ScenariosIndex | Self::ScenariosReload | Self::ScenariosView(_)
        )
    }

    /// Full path including parameters
    #[must_use]
    pub fn path(&self) -> String {
        let params: Vec<&str> = match self {
            Self::ScenariosView(uuid)
            | Self::ScenariosDelete(uuid)
            | Self::InjectSave(uuid)
            | Self::InjectOrder(uuid) => vec![uuid.as_str()],
            Self::InjectDelete(scenario, inject) => vec![scenario.as_str(), inject.as_str()],
            _ => Vec::new(),
        };

        let mut path = self.base_path().to_string();
        for param in params {
            path.push('/');
            path.push_str(param);
        }
        path
    }
}
