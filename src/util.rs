//! Shared utility functions used across the codebase.

/// Read an environment variable, treating unset and blank values the same.
pub fn env_var_nonempty(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        _ => None,
    }
}

/// Shorten `text` to at most `max_chars` characters for log lines and error details.
///
/// Cuts on a char boundary and appends `…` when something was dropped.
pub fn truncate_for_log(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}
