/// Truncate a string to at most `max_bytes` bytes at a character boundary.
pub fn truncate_to_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) && end > 0 {
        end -= 1;
    }
    &s[..end]
}

/// Single-line, length-capped rendering of model output for log fields.
pub fn log_preview(text: &str, max_bytes: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let cut = truncate_to_char_boundary(&flat, max_bytes);
    if cut.len() < flat.len() {
        format!("{cut}...")
    } else {
        flat
    }
}
