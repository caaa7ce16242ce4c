pub mod claude;
pub mod error;
pub mod image;
pub mod ollama;
pub mod traits;
pub mod util;

pub use claude::Claude;
pub use error::{AiError, Result};
pub use image::ImageInput;
pub use ollama::Ollama;
pub use traits::{TextModel, VisionModel};
pub use util::{log_preview, truncate_to_char_boundary};
