//! Base64 helpers for judgehost payloads

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use crate::error::{AppError, AppResult};

/// Decode a base64 text payload from a judgehost
pub fn decode_base64(input: &str) -> AppResult<String> {
    let bytes = BASE64
        .decode(input)
        .map_err(|_| AppError::InvalidInput("Invalid base64 payload".to_string()))?;
    String::from_utf8(bytes)
        .map_err(|_| AppError::InvalidInput("Payload is not valid UTF-8".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_valid_payload() {
        assert_eq!(decode_base64("aGVsbG8=").unwrap(), "hello");
    }

    #[test]
    fn rejects_garbage() {
        assert!(decode_base64("not base64!!!").is_err());
    }
}
