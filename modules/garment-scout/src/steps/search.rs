use serde_json::Value;
use tracing::info;

use crate::outcome::{Step, StepError, Stepped};
use crate::state::{empty_search_results, PipelineState, ORGANIC};
use crate::traits::WebSearch;

/// Run the query against the search backend. Whatever happens, the state
/// leaves with `search_results` holding an `organic` list.
pub async fn search_internet(state: PipelineState, searcher: &dyn WebSearch) -> Stepped {
    if state.search_query.is_empty() {
        return Stepped::degraded(
            Step::SearchInternet,
            PipelineState {
                search_results: empty_search_results(),
                ..state
            },
            StepError::MissingQuery,
        );
    }

    info!(query = state.search_query.as_str(), "Searching the web");

    let (search_results, problem) = match searcher.search(&state.search_query).await {
        Ok(payload) => normalize_results(payload),
        Err(e) => (empty_search_results(), Some(StepError::from(e))),
    };

    let state = PipelineState {
        search_results,
        ..state
    };
    match problem {
        None => Stepped::applied(state),
        Some(e) => Stepped::degraded(Step::SearchInternet, state, e),
    }
}

/// Coerce a raw payload into a mapping with an `organic` list.
///
/// A mapping with no `organic` key is a legitimate empty result and gets an
/// empty list. A non-mapping payload, or an `organic` that is not a list, is
/// reported alongside the repaired value.
pub fn normalize_results(payload: Value) -> (Value, Option<StepError>) {
    match payload {
        Value::Object(mut map) => match map.get(ORGANIC) {
            Some(Value::Array(_)) => (Value::Object(map), None),
            Some(_) => {
                map.insert(ORGANIC.to_string(), Value::Array(Vec::new()));
                (
                    Value::Object(map),
                    Some(StepError::Malformed(format!("`{ORGANIC}` is not a list"))),
                )
            }
            None => {
                map.insert(ORGANIC.to_string(), Value::Array(Vec::new()));
                (Value::Object(map), None)
            }
        },
        _ => (empty_search_results(), Some(StepError::NotAMapping)),
    }
}
