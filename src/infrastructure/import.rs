//! Token import from operator-supplied files.

use serde_json::Value;
use std::path::Path;

/// Read tokens from a `.txt` (one per line) or `.json` (array of strings) file.
///
/// A `.json` file that is not a string array falls back to line splitting.
/// Blank lines are kept; the verifier skips them.
pub fn read_token_file(path: &Path) -> anyhow::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    let content = content.trim();

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if is_json {
        if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(content) {
            let tokens: Vec<String> = items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(token) => Some(token),
                    _ => None,
                })
                .collect();
            tracing::info!("Imported {} tokens from {:?}", tokens.len(), path);
            return Ok(tokens);
        }
        tracing::debug!("{:?} is not a JSON token list, reading it as text", path);
    }

    let tokens = split_lines(content);
    tracing::info!("Imported {} lines from {:?}", tokens.len(), path);
    Ok(tokens)
}

fn split_lines(content: &str) -> Vec<String> {
    if content.is_empty() {
        return Vec::new();
    }
    content.lines().map(str::to_string).collect()
}
