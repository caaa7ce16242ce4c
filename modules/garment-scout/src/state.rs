use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Key of the ranked result list inside a search payload.
pub const ORGANIC: &str = "organic";

/// The record handed from step to step. Each step owns it while running and
/// fills in exactly one derived field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineState {
    pub image_path: PathBuf,
    pub image_description: String,
    pub search_query: String,
    pub search_results: Value,
    pub recommendations: Vec<String>,
}

impl PipelineState {
    /// Fresh state for one run: derived fields empty, `search_results` an empty mapping.
    pub fn new(image_path: impl Into<PathBuf>) -> Self {
        Self {
            image_path: image_path.into(),
            image_description: String::new(),
            search_query: String::new(),
            search_results: Value::Object(Map::new()),
            recommendations: Vec::new(),
        }
    }
}

/// `{"organic": []}`, the payload used whenever a search yields nothing usable.
pub fn empty_search_results() -> Value {
    json!({ ORGANIC: [] })
}
