use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Number;

/// Catalog place identifier; catalogs use either numbers or strings.
///
/// Serializes back in the shape it was read, so ids reach the computation
/// process unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlaceId {
    Number(Number),
    Text(String),
}

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaceId::Number(number) => write!(f, "{number}"),
            PlaceId::Text(text) => f.write_str(text),
        }
    }
}

impl From<&str> for PlaceId {
    fn from(text: &str) -> Self {
        PlaceId::Text(text.to_string())
    }
}

impl From<u64> for PlaceId {
    fn from(number: u64) -> Self {
        PlaceId::Number(number.into())
    }
}

/// Read a place id of either shape as its text form.
pub(crate) fn place_id_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    PlaceId::deserialize(deserializer).map(|id| id.to_string())
}

/// `null` reads as an empty list.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_place_id_keeps_its_shape() {
        let ids: Vec<PlaceId> = serde_json::from_value(json!([3, "LK015"])).unwrap();
        assert_eq!(ids, vec![PlaceId::from(3), PlaceId::from("LK015")]);
        assert_eq!(ids[0].to_string(), "3");
        assert_eq!(serde_json::to_value(&ids).unwrap(), json!([3, "LK015"]));
    }
}
