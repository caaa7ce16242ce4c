use std::path::PathBuf;
use std::sync::Arc;

use ai_client::{Claude, Ollama, TextModel, VisionModel};
use anyhow::{Context, Result};
use serper_client::{SearchOptions, SerperClient};
use tracing::info;

use crate::config::{Config, Provider};
use crate::outcome::{Step, StepOutcome, Stepped};
use crate::state::PipelineState;
use crate::steps::{generate_query, process_image, recommend_stores, search_internet};
use crate::traits::WebSearch;

/// One step's entry in a [`RunReport`].
#[derive(Debug)]
pub struct StepReport {
    pub step: Step,
    pub outcome: StepOutcome,
}

/// Final state of a run plus the outcome of every step, in run order.
#[derive(Debug)]
pub struct RunReport {
    pub state: PipelineState,
    pub steps: Vec<StepReport>,
}

impl RunReport {
    pub fn recommendations(&self) -> &[String] {
        &self.state.recommendations
    }

    pub fn degraded_steps(&self) -> impl Iterator<Item = &StepReport> {
        self.steps.iter().filter(|s| !s.outcome.is_applied())
    }

    pub fn is_clean(&self) -> bool {
        self.degraded_steps().next().is_none()
    }
}

/// The fixed four-step chain: describe, query, search, recommend.
pub struct Pipeline {
    vision: Arc<dyn VisionModel>,
    text: Arc<dyn TextModel>,
    searcher: Arc<dyn WebSearch>,
}

impl Pipeline {
    pub fn new(
        vision: Arc<dyn VisionModel>,
        text: Arc<dyn TextModel>,
        searcher: Arc<dyn WebSearch>,
    ) -> Self {
        Self {
            vision,
            text,
            searcher,
        }
    }

    /// Wire up the real model and search clients described by `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let model_timeout = config.model_timeout;

        let (vision, text): (Arc<dyn VisionModel>, Arc<dyn TextModel>) = match config.provider {
            Provider::Ollama => {
                let ollama = |model: &str| {
                    let mut client = Ollama::new(model)
                        .with_base_url(&config.ollama_base_url)
                        .with_timeout(model_timeout);
                    if let Some(num_gpu) = config.ollama_num_gpu {
                        client = client.with_num_gpu(num_gpu);
                    }
                    client
                };
                let vision: Arc<dyn VisionModel> = Arc::new(ollama(config.vision_model.as_str()));
                let text: Arc<dyn TextModel> = Arc::new(
                    ollama(config.text_model.as_str()).with_max_tokens(config.text_max_tokens),
                );
                (vision, text)
            }
            Provider::Claude => {
                let api_key = config
                    .anthropic_api_key
                    .as_deref()
                    .context("ANTHROPIC_API_KEY is required for the claude provider")?;
                let claude = |model: &str| Claude::new(api_key, model).with_timeout(model_timeout);
                let vision: Arc<dyn VisionModel> = Arc::new(claude(config.vision_model.as_str()));
                let text: Arc<dyn TextModel> = Arc::new(
                    claude(config.text_model.as_str()).with_max_tokens(config.text_max_tokens),
                );
                (vision, text)
            }
        };

        let searcher = SerperClient::new(&config.serper_api_key)?
            .with_timeout(config.search_timeout)?
            .with_options(SearchOptions {
                gl: config.search_country.clone(),
                hl: config.search_language.clone(),
                ..SearchOptions::default()
            });

        info!(
            provider = config.provider.as_str(),
            vision_model = config.vision_model.as_str(),
            text_model = config.text_model.as_str(),
            model_timeout_secs = model_timeout.as_secs(),
            search_timeout_secs = config.search_timeout.as_secs(),
            "Pipeline configured"
        );

        Ok(Self::new(vision, text, Arc::new(searcher)))
    }

    /// Run all four steps for one image. Never fails: degraded steps are
    /// listed in the report.
    pub async fn run(&self, image_path: impl Into<PathBuf>) -> RunReport {
        self.run_state(PipelineState::new(image_path)).await
    }

    pub async fn run_state(&self, state: PipelineState) -> RunReport {
        info!(image = %state.image_path.display(), "Pipeline run starting");
        let mut steps = Vec::with_capacity(Step::ALL.len());

        let state = record(
            &mut steps,
            Step::ProcessImage,
            process_image(state, self.vision.as_ref()).await,
        );
        let state = record(
            &mut steps,
            Step::GenerateQuery,
            generate_query(state, self.text.as_ref()).await,
        );
        let state = record(
            &mut steps,
            Step::SearchInternet,
            search_internet(state, self.searcher.as_ref()).await,
        );
        let state = record(&mut steps, Step::RecommendStores, recommend_stores(state));

        let report = RunReport { state, steps };
        info!(
            recommendations = report.recommendations().len(),
            degraded = report.degraded_steps().count(),
            "Pipeline run finished"
        );
        report
    }
}

fn record(steps: &mut Vec<StepReport>, step: Step, stepped: Stepped) -> PipelineState {
    steps.push(StepReport {
        step,
        outcome: stepped.outcome,
    });
    stepped.state
}

/// Numbered list for terminal output.
pub fn format_recommendations(recommendations: &[String]) -> String {
    let mut out = String::from("Recommendations:\n");
    if recommendations.is_empty() {
        out.push_str("(none found)\n");
    }
    for (i, rec) in recommendations.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, rec));
    }
    out
}
