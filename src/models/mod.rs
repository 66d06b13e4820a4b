//! Diesel row types and the JSON-in-text boundary for list columns.

pub mod category;
pub mod product;
pub mod visit;

/// Encode a list column as JSON text.
pub fn encode_list(values: &[String]) -> Result<String, serde_json::Error> {
    serde_json::to_string(values)
}

/// Decode a list column stored as JSON text. Blank values decode as empty.
pub fn decode_list(raw: &str) -> Result<Vec<String>, serde_json::Error> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(raw)
}
