pub mod analysis;
pub mod response;
pub mod resume;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Backend JSON is produced by a language model and is loose about types.
/// Missing or `null` becomes `""`, numbers and booleans are stringified.
pub(crate) fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}
