//! The four pipeline stages. Each takes the state by value and always hands
//! one back; failures are logged and recorded in the [`Stepped`] outcome.
//!
//! ```text
//! process_image → generate_query → search_internet → recommend_stores
//!   description       query          organic[]          links ≤ 5
//! ```
//!
//! `process_image` and `generate_query` return their input untouched when they
//! fail. `search_internet` and `recommend_stores` instead write an empty
//! default into their own field, since later readers expect it to be present.
//!
//! [`Stepped`]: crate::outcome::Stepped

mod describe;
mod query;
mod recommend;
mod search;

pub use describe::{process_image, DESCRIBE_PROMPT};
pub use query::{clean_query, generate_query, query_prompt, MAX_QUERY_WORDS};
pub use recommend::{extract_links, recommend_stores, MAX_RECOMMENDATIONS};
pub use search::{normalize_results, search_internet};
