//! Typed views over server replies
//!
//! Write endpoints answer `{success, title, message, data}`. Only an
//! explicit `success: true` counts as accepted; the raw JSON is kept
//! alongside the typed fields.

use crate::error::ApiError;
use scenario_model::serde_ext::value_to_text;
use scenario_model::Scenario;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Server feedback for a write
#[derive(Debug, Clone, PartialEq)]
pub struct ServerReply {
    pub success: bool,
    pub title: String,
    /// Rendered as text whatever JSON type the server sent
    pub message: String,
    pub data: Value,
    pub raw: Value,
}

impl ServerReply {
    /// Interpret a reply body; it must be a JSON object
    pub fn from_value(raw: Value) -> Result<Self, ApiError> {
        let Value::Object(fields) = &raw else {
            return Err(ApiError::Malformed(serde::de::Error::custom(format!(
                "expected reply object, got {raw}"
            ))));
        };

        let text = |key: &str| fields.get(key).map(value_to_text).unwrap_or_default();
        Ok(Self {
            success: fields.get("success").and_then(Value::as_bool).unwrap_or(false),
            title: text("title"),
            message: text("message"),
            data: fields.get("data").cloned().unwrap_or(Value::Null),
            raw,
        })
    }

    /// Decode `data` into a typed value
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        Ok(serde_json::from_value(self.data.clone())?)
    }
}

/// Result of a write endpoint
#[derive(Debug, Clone, PartialEq)]
#[must_use = "a write may have been rejected by the server"]
pub enum WriteOutcome {
    Accepted(ServerReply),
    Rejected(ServerReply),
}

impl WriteOutcome {
    /// Classify a reply body
    pub fn from_value(raw: Value) -> Result<Self, ApiError> {
        let reply = ServerReply::from_value(raw)?;
        Ok(if reply.success {
            Self::Accepted(reply)
        } else {
            Self::Rejected(reply)
        })
    }

    #[inline]
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    #[must_use]
    pub fn reply(&self) -> &ServerReply {
        match self {
            Self::Accepted(reply) | Self::Rejected(reply) => reply,
        }
    }

    #[must_use]
    pub fn into_reply(self) -> ServerReply {
        match self {
            Self::Accepted(reply) | Self::Rejected(reply) => reply,
        }
    }

    /// Full reply body as received
    #[must_use]
    pub fn raw(&self) -> &Value {
        &self.reply().raw
    }

    /// Turn a rejection into [`ApiError::Rejected`]
    pub fn into_result(self) -> Result<ServerReply, ApiError> {
        match self {
            Self::Accepted(reply) => Ok(reply),
            Self::Rejected(reply) => Err(ApiError::Rejected {
                title: reply.title,
                message: reply.message,
            }),
        }
    }
}

/// Result of viewing one scenario
#[derive(Debug, Clone, PartialEq)]
pub enum ViewOutcome {
    Found(Scenario),
    /// The server answered with an error reply instead of a scenario
    NotFound(ServerReply),
}

impl ViewOutcome {
    /// Classify a view body
    ///
    /// A scenario document never carries `success`, so any object with
    /// `success: false` is an error reply.
    pub fn from_value(raw: Value) -> Result<Self, ApiError> {
        if raw.get("success").and_then(Value::as_bool) == Some(false) {
            return Ok(Self::NotFound(ServerReply::from_value(raw)?));
        }
        Ok(Self::Found(serde_json::from_value(raw)?))
    }

    #[must_use]
    pub fn found(self) -> Option<Scenario> {
        match self {
            Self::Found(scenario) => Some(scenario),
            Self::NotFound(_) => None,
        }
    }
}
