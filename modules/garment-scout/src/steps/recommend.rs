use serde_json::Value;
use tracing::info;

use crate::outcome::{Step, StepError, Stepped};
use crate::state::{PipelineState, ORGANIC};

pub const MAX_RECOMMENDATIONS: usize = 5;

/// Pick the top links out of `search_results`. On any structural problem the
/// recommendations are reset to an empty list.
pub fn recommend_stores(state: PipelineState) -> Stepped {
    match extract_links(&state.search_results) {
        Ok(recommendations) => {
            info!(count = recommendations.len(), "Store recommendations extracted");
            Stepped::applied(PipelineState {
                recommendations,
                ..state
            })
        }
        Err(e) => Stepped::degraded(
            Step::RecommendStores,
            PipelineState {
                recommendations: Vec::new(),
                ..state
            },
            e,
        ),
    }
}

/// The `link` of each of the first [`MAX_RECOMMENDATIONS`] organic results,
/// in ranking order. A result without a link (or with a null one) yields `""`.
pub fn extract_links(search_results: &Value) -> Result<Vec<String>, StepError> {
    let results = search_results
        .as_object()
        .ok_or(StepError::MissingSearchResults)?;

    let organic = match results.get(ORGANIC) {
        None => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(StepError::Malformed(format!("`{ORGANIC}` is not a list")));
        }
    };

    organic
        .iter()
        .take(MAX_RECOMMENDATIONS)
        .enumerate()
        .map(|(rank, item)| {
            let item = item.as_object().ok_or_else(|| {
                StepError::Malformed(format!("result {rank} is not an object"))
            })?;
            match item.get("link") {
                None | Some(Value::Null) => Ok(String::new()),
                Some(Value::String(link)) => Ok(link.clone()),
                Some(_) => Err(StepError::Malformed(format!(
                    "result {rank} has a non-string link"
                ))),
            }
        })
        .collect()
}
