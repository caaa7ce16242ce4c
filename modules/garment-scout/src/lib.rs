pub mod config;
pub mod outcome;
pub mod pipeline;
pub mod state;
pub mod steps;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;

pub use config::{Config, Provider};
pub use outcome::{Step, StepError, StepOutcome, Stepped};
pub use pipeline::{format_recommendations, Pipeline, RunReport, StepReport};
pub use state::PipelineState;
pub use traits::WebSearch;
