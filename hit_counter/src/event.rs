use serde_json::Value;

use crate::error::ProxyError;

/// Field of the inbound event that selects the counter.
pub const PATH_FIELD: &str = "path";

/// Returns the counting key for an invocation: the `path` field, verbatim.
///
/// No trimming, percent-decoding or case folding is applied, so `/a` and `/a/`
/// are counted separately.
pub fn counting_key(event: &Value) -> Result<&str, ProxyError> {
    match event.get(PATH_FIELD).and_then(Value::as_str) {
        Some(path) if !path.is_empty() => Ok(path),
        _ => Err(ProxyError::MissingPath),
    }
}
