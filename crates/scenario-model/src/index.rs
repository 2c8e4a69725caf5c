//! Scenario index responses and per-file read errors

use crate::scenario::Scenario;
use crate::serde_ext::{lenient_string, null_as_default};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// A scenario file the server could not parse
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadError {
    /// File name relative to the exercise directory
    #[serde(default)]
    pub file: String,

    /// Parser error description
    #[serde(default, deserialize_with = "lenient_string")]
    pub error: String,

    /// Raw file content
    #[serde(default, deserialize_with = "lenient_string")]
    pub text: String,
}

#[derive(Deserialize)]
struct ReadErrorBody {
    #[serde(default, deserialize_with = "lenient_string")]
    error: String,
    #[serde(default, deserialize_with = "lenient_string")]
    text: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ReadErrorsRepr {
    Keyed(IndexMap<String, ReadErrorBody>),
    Listed(Vec<ReadError>),
}

/// Accept read errors either keyed by file name or as a list
///
/// Keyed entries keep the order the server sent them in.
pub fn deserialize_read_errors<'de, D>(deserializer: D) -> Result<Vec<ReadError>, D::Error>
where
    D: Deserializer<'de>,
{
    let errors = match Option::<ReadErrorsRepr>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(ReadErrorsRepr::Listed(list)) => list,
        Some(ReadErrorsRepr::Keyed(map)) => map
            .into_iter()
            .map(|(file, body)| ReadError {
                file,
                error: body.error,
                text: body.text,
            })
            .collect(),
    };
    Ok(errors)
}

/// Body of the list and reload endpoints
///
/// The server also sends a `scenario_by_uuid` map; it duplicates
/// `scenarios` and is ignored in favour of the store's own lookup.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ScenarioIndex {
    /// All scenarios the server could read
    #[serde(default, deserialize_with = "null_as_default")]
    pub scenarios: Vec<Scenario>,

    /// Files that failed to parse
    #[serde(default, deserialize_with = "deserialize_read_errors")]
    pub read_errors: Vec<ReadError>,
}
