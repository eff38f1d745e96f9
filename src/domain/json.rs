use serde::de::{DeserializeOwned, Error as _};
use serde_json::Value;

/// Decodes `text` into `T` only when it holds a JSON object. Derived
/// `Deserialize` impls would otherwise accept arrays and fill fields by
/// position.
pub fn from_object_str<T: DeserializeOwned>(text: &str) -> Result<T, serde_json::Error> {
    match serde_json::from_str::<Value>(text)? {
        object @ Value::Object(_) => serde_json::from_value(object),
        _ => Err(serde_json::Error::custom("expected a JSON object")),
    }
}
