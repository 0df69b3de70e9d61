use crate::error::Error;
use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// JSON request body where an absent body reads as all-defaults
///
/// Required-field checks then report a validation error instead of the
/// extractor rejecting the request outright. Malformed JSON is a
/// validation error too.
#[derive(Debug, Clone, Default)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| Error::validation(e.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonBody(T::default()));
        }

        serde_json::from_slice(&bytes)
            .map(JsonBody)
            .map_err(|e| Error::validation(format!("Invalid JSON body: {}", e)))
    }
}

/// Read a chunk number given as a JSON number or numeric string
///
/// `None` means the field was absent.
pub fn chunk_number(value: &Value) -> Option<Result<u32, Error>> {
    let parsed = match value {
        Value::Null => return None,
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    };
    Some(parsed.ok_or_else(|| Error::validation("chunkNumber must be a non-negative integer")))
}

/// Parse a chunk number taken from a URL path segment
pub fn chunk_number_from_path(segment: &str) -> Result<u32, Error> {
    chunk_number(&Value::String(segment.to_string()))
        .unwrap_or_else(|| Err(Error::validation("chunkNumber required")))
}

/// Session id taken from a URL path segment, used to name chunk files
///
/// Decoded separators and dot segments are refused.
pub fn session_id_from_path(segment: &str) -> Result<&str, Error> {
    let unsafe_name = segment.is_empty()
        || segment == "."
        || segment.contains("..")
        || segment.contains(['/', '\\', '\0']);
    if unsafe_name {
        return Err(Error::validation("Invalid sessionId"));
    }
    Ok(segment)
}

/// Truthiness of a loosely typed JSON flag
///
/// `null`, `false`, `0` and `""` are false; every other value is true,
/// including the string `"false"`.
pub fn flag(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn chunk_number_accepts_numbers_and_numeric_strings() {
        assert_eq!(chunk_number(&json!(0)).unwrap().unwrap(), 0);
        assert_eq!(chunk_number(&json!("12")).unwrap().unwrap(), 12);
        assert!(chunk_number(&Value::Null).is_none());
        assert!(chunk_number(&json!("abc")).unwrap().is_err());
        assert!(chunk_number(&json!(-1)).unwrap().is_err());
        assert!(chunk_number_from_path("7").is_ok());
    }

    #[test]
    fn session_id_rejects_path_traversal() {
        assert_eq!(session_id_from_path("session_abc").unwrap(), "session_abc");
        assert!(session_id_from_path("../escaped").is_err());
        assert!(session_id_from_path("..").is_err());
        assert!(session_id_from_path("a/b").is_err());
        assert!(session_id_from_path("a\\b").is_err());
    }

    #[test]
    fn flag_follows_loose_truthiness() {
        assert!(flag(&json!(true)));
        assert!(flag(&json!("true")));
        assert!(flag(&json!(1)));
        assert!(!flag(&json!(false)));
        assert!(!flag(&json!(0)));
        assert!(!flag(&json!("")));
        assert!(!flag(&Value::Null));
    }
}
