use serde::Serialize;

/// Request-shaping options applied to every query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    /// Number of results to ask for.
    pub num: u32,
    /// Country code (`gl`).
    pub gl: String,
    /// Interface language (`hl`).
    pub hl: String,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            num: 10,
            gl: "us".to_string(),
            hl: "en".to_string(),
        }
    }
}

/// Body of `POST /search`.
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest<'a> {
    pub q: &'a str,
    pub num: u32,
    pub gl: &'a str,
    pub hl: &'a str,
}

impl<'a> SearchRequest<'a> {
    pub fn new(query: &'a str, options: &'a SearchOptions) -> Self {
        Self {
            q: query,
            num: options.num,
            gl: &options.gl,
            hl: &options.hl,
        }
    }
}
