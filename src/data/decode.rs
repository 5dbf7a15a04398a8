//! Case-insensitive JSON decoding
//!
//! The user API is not consistent about key casing (`data` vs `Data`,
//! `first_name` vs `First_Name`). Object keys are lower-cased before typed
//! decoding so the snake_case model fields match any casing.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Decodes a JSON body into `T`, matching object keys case-insensitively
pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T, serde_json::Error> {
    let value: Value = serde_json::from_str(body)?;
    decode_value(value)
}

/// Decodes an already-parsed JSON value into `T`, matching object keys case-insensitively
pub fn decode_value<T: DeserializeOwned>(value: Value) -> Result<T, serde_json::Error> {
    serde_json::from_value(normalize_keys(value))
}

/// Recursively lower-cases every object key
///
/// When two keys collide after lower-casing, the one appearing later wins.
fn normalize_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key.to_lowercase(), normalize_keys(value)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_keys).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        first_name: String,
        total_pages: u32,
    }

    #[test]
    fn test_decode_matches_keys_in_any_case() {
        let sample: Sample =
            decode(r#"{"First_Name": "Janet", "TOTAL_PAGES": 2}"#).expect("Failed to decode");

        assert_eq!(
            sample,
            Sample {
                first_name: "Janet".to_string(),
                total_pages: 2,
            }
        );
    }

    #[test]
    fn test_normalize_keys_recurses_into_arrays() {
        let normalized = normalize_keys(json!({
            "Data": [{"ID": 1, "Email": "a@b.com"}]
        }));

        assert_eq!(normalized, json!({"data": [{"id": 1, "email": "a@b.com"}]}));
    }

    #[test]
    fn test_values_are_left_untouched() {
        let normalized = normalize_keys(json!({"Name": "MixedCase Value"}));
        assert_eq!(normalized["name"], "MixedCase Value");
    }

    #[test]
    fn test_decode_rejects_malformed_json() {
        let result: Result<Sample, _> = decode("{ invalid json }");
        assert!(result.is_err());
    }
}
