// Test mocks for the garment pipeline.
//
// One mock per collaborator seam:
// - MockVision (VisionModel) — canned description or failure, records calls
// - MockText (TextModel) — canned completion or failure, records prompts
// - MockSearch (WebSearch) — canned payload or API error, records queries
//
// Plus helpers for writing image fixtures and building search payloads.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use ai_client::{AiError, ImageInput, TextModel, VisionModel};
use async_trait::async_trait;
use serde_json::{json, Value};
use serper_client::SerperError;

use crate::traits::WebSearch;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// JPEG start-of-image marker followed by padding. Enough for the pipeline,
/// which never decodes pixels.
const FAKE_JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

/// Write a small image file into `dir` and return its path.
pub fn write_test_image(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, FAKE_JPEG).expect("write test image");
    path
}

/// A Serper-shaped payload whose organic results carry the given links.
pub fn organic(links: &[&str]) -> Value {
    let results: Vec<Value> = links
        .iter()
        .enumerate()
        .map(|(i, link)| {
            json!({
                "position": i + 1,
                "title": format!("Result {}", i + 1),
                "link": link,
            })
        })
        .collect();
    json!({ "organic": results })
}

fn model_failure(message: &str) -> AiError {
    AiError::Api {
        status: 500,
        message: message.to_string(),
    }
}

// ---------------------------------------------------------------------------
// MockVision
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct VisionCall {
    pub prompt: String,
    pub mime_type: String,
    pub bytes: usize,
}

pub struct MockVision {
    reply: Result<String, String>,
    calls: Mutex<Vec<VisionCall>>,
}

impl MockVision {
    pub fn replying(description: &str) -> Self {
        Self {
            reply: Ok(description.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<VisionCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl VisionModel for MockVision {
    fn model(&self) -> &str {
        "mock-vision"
    }

    async fn describe_image(&self, image: &ImageInput, prompt: &str) -> ai_client::Result<String> {
        self.calls.lock().unwrap().push(VisionCall {
            prompt: prompt.to_string(),
            mime_type: image.mime_type.clone(),
            bytes: image.bytes.len(),
        });
        self.reply.clone().map_err(|m| model_failure(&m))
    }
}

// ---------------------------------------------------------------------------
// MockText
// ---------------------------------------------------------------------------

pub struct MockText {
    reply: Result<String, String>,
    prompts: Mutex<Vec<String>>,
}

impl MockText {
    pub fn replying(completion: &str) -> Self {
        Self {
            reply: Ok(completion.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextModel for MockText {
    fn model(&self) -> &str {
        "mock-text"
    }

    async fn complete(&self, prompt: &str) -> ai_client::Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone().map_err(|m| model_failure(&m))
    }
}

// ---------------------------------------------------------------------------
// MockSearch
// ---------------------------------------------------------------------------

enum SearchReply {
    Payload(Value),
    Api { status: u16, message: String },
}

pub struct MockSearch {
    reply: SearchReply,
    queries: Mutex<Vec<String>>,
}

impl MockSearch {
    pub fn returning(payload: Value) -> Self {
        Self {
            reply: SearchReply::Payload(payload),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(status: u16, message: &str) -> Self {
        Self {
            reply: SearchReply::Api {
                status,
                message: message.to_string(),
            },
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl WebSearch for MockSearch {
    async fn search(&self, query: &str) -> serper_client::Result<Value> {
        self.queries.lock().unwrap().push(query.to_string());
        match &self.reply {
            SearchReply::Payload(payload) => Ok(payload.clone()),
            SearchReply::Api { status, message } => Err(SerperError::Api {
                status: *status,
                message: message.clone(),
            }),
        }
    }
}
