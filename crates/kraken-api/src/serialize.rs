//! Request body encoding.
//!
//! The Kraken write endpoints match body fields case-sensitively against
//! all-lowercase names. [`to_lowercase_json`] enforces that on the wire for
//! every key, including nested objects, regardless of how the source type
//! spells its fields.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::Result;

/// Serialize `value` to JSON with every object key lowercased, recursively.
pub fn to_lowercase_json<T: Serialize>(value: &T) -> Result<String> {
    let value = serde_json::to_value(value)?;
    Ok(lowercase_keys(value).to_string())
}

fn lowercase_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k.to_lowercase(), lowercase_keys(v)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(lowercase_keys).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Serialize)]
    struct MixedCaseBody {
        #[serde(rename = "Status")]
        status: String,
        #[serde(rename = "GameName")]
        game_name: String,
        #[serde(rename = "Delay")]
        delay: u32,
        #[serde(rename = "Tags")]
        tags: Vec<NestedTag>,
    }

    #[derive(Serialize)]
    struct NestedTag {
        #[serde(rename = "DisplayText")]
        display_text: String,
    }

    #[derive(Deserialize)]
    struct LowercaseBody {
        status: String,
        gamename: String,
        delay: u32,
        tags: Vec<LowercaseTag>,
    }

    #[derive(Deserialize)]
    struct LowercaseTag {
        displaytext: String,
    }

    #[test]
    fn test_keys_are_lowercased_recursively() {
        let body = MixedCaseBody {
            status: "new title".to_string(),
            game_name: "Tetris".to_string(),
            delay: 30,
            tags: vec![NestedTag {
                display_text: "speedrun".to_string(),
            }],
        };

        let json = to_lowercase_json(&body).unwrap();
        assert!(!json.contains("Status"));
        assert!(!json.contains("GameName"));
        assert!(!json.contains("DisplayText"));

        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["status"], "new title");
        assert_eq!(value["gamename"], "Tetris");
        assert_eq!(value["tags"][0]["displaytext"], "speedrun");
    }

    #[test]
    fn test_round_trip_recovers_values() {
        let body = MixedCaseBody {
            status: "hello".to_string(),
            game_name: "Chess".to_string(),
            delay: 0,
            tags: vec![],
        };

        let json = to_lowercase_json(&body).unwrap();
        let decoded: LowercaseBody = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.status, "hello");
        assert_eq!(decoded.gamename, "Chess");
        assert_eq!(decoded.delay, 0);
        assert!(decoded.tags.is_empty());
    }

    #[test]
    fn test_scalars_pass_through() {
        assert_eq!(to_lowercase_json(&42u32).unwrap(), "42");
        assert_eq!(to_lowercase_json(&"MixedCase").unwrap(), "\"MixedCase\"");
    }
}
