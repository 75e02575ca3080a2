//! Custom serde helpers for query-string parameters.

use serde::{Deserialize, Deserializer};
use uuid::Uuid;

/// Deserializes an optional UUID, treating an empty string as absent.
///
/// Query strings deliver every value as a string and clients sometimes
/// send `?hospital_id=` with no value. Empty means unfiltered rather
/// than a 400.
pub fn deserialize_optional_uuid<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt.as_deref() {
        None | Some("") => Ok(None),
        Some(value) => Uuid::parse_str(value)
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid uuid: {value}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, serde::Deserialize)]
    struct Params {
        #[serde(default, deserialize_with = "deserialize_optional_uuid")]
        hospital_id: Option<Uuid>,
    }

    #[test]
    fn test_empty_string_is_none() {
        let params: Params = serde_json::from_value(json!({"hospital_id": ""})).unwrap();
        assert_eq!(params.hospital_id, None);

        let params: Params = serde_json::from_value(json!({})).unwrap();
        assert_eq!(params.hospital_id, None);
    }

    #[test]
    fn test_valid_uuid_parses() {
        let params: Params = serde_json::from_value(json!({
            "hospital_id": "0c7f94f0-7cc5-4f9d-9d1b-6a87c2fb3a9e"
        }))
        .unwrap();
        assert_eq!(
            params.hospital_id,
            Some(Uuid::parse_str("0c7f94f0-7cc5-4f9d-9d1b-6a87c2fb3a9e").unwrap())
        );
    }

    #[test]
    fn test_garbage_is_rejected() {
        let result: Result<Params, _> =
            serde_json::from_value(json!({"hospital_id": "not-a-uuid"}));
        assert!(result.is_err());
    }
}
