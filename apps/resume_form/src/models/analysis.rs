use serde::de::{self, Unexpected};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::resume::{EducationEntry, ExperienceEntry};
use super::string_or_empty;

/// One skill as returned by `/analyze`: either `"Go"` or `{"name": "Go"}`.
/// Anything else is kept as `Other` and dropped during normalization.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SkillItem {
    Plain(String),
    Named { name: String },
    Other(Value),
}

impl SkillItem {
    pub fn label(&self) -> Option<&str> {
        let label = match self {
            SkillItem::Plain(s) => s.trim(),
            SkillItem::Named { name } => name.trim(),
            SkillItem::Other(_) => return None,
        };
        (!label.is_empty()).then_some(label)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Skills {
    List(Vec<SkillItem>),
    Text(String),
}

impl Default for Skills {
    fn default() -> Self {
        Skills::List(Vec::new())
    }
}

/// Joins every usable skill with `", "`, preserving order.
pub fn normalize_skills(skills: &Skills) -> String {
    match skills {
        Skills::Text(text) => text.trim().to_string(),
        Skills::List(items) => items
            .iter()
            .filter_map(SkillItem::label)
            .collect::<Vec<_>>()
            .join(", "),
    }
}

/// Structured result of `/analyze`. Absent fields deserialize to empty values.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AnalysisResult {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub phone: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub location: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub summary: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Skills,
    #[serde(default, deserialize_with = "null_as_default")]
    pub education: Vec<EducationEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub experience: Vec<ExperienceEntry>,
}

/// Accepts both the flat result and the `{"ai_parsed": {...}}` envelope.
/// The body must be an object. When `ai_parsed` is present it alone is
/// decoded, and a malformed one is an error rather than an empty result.
pub fn parse_analysis(body: &[u8]) -> Result<AnalysisResult, serde_json::Error> {
    let mut object = into_object(serde_json::from_slice(body)?)?;
    let fields = match object.remove("ai_parsed") {
        Some(parsed) => into_object(parsed)?,
        None => object,
    };
    AnalysisResult::deserialize(Value::Object(fields))
}

fn into_object(value: Value) -> Result<Map<String, Value>, serde_json::Error> {
    match value {
        Value::Object(object) => Ok(object),
        other => Err(de::Error::invalid_type(unexpected(&other), &"a JSON object")),
    }
}

fn unexpected(value: &Value) -> Unexpected<'_> {
    match value {
        Value::Null => Unexpected::Unit,
        Value::Bool(b) => Unexpected::Bool(*b),
        Value::Number(_) => Unexpected::Other("number"),
        Value::String(s) => Unexpected::Str(s),
        Value::Array(_) => Unexpected::Seq,
        Value::Object(_) => Unexpected::Map,
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skills_mixed_forms_are_normalized_in_order() {
        let result = parse_analysis(br#"{"skills": ["Go", {"name": "Rust"}, {}, "C++"]}"#).unwrap();
        assert_eq!(normalize_skills(&result.skills), "Go, Rust, C++");
    }

    #[test]
    fn test_skills_drop_blank_and_non_string_names() {
        let result =
            parse_analysis(br#"{"skills": ["", {"name": 5}, 7, {"name": " SQL "}]}"#).unwrap();
        assert_eq!(normalize_skills(&result.skills), "SQL");
    }

    #[test]
    fn test_skills_as_single_string() {
        let result = parse_analysis(br#"{"skills": "Go, Rust"}"#).unwrap();
        assert_eq!(normalize_skills(&result.skills), "Go, Rust");
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let result = parse_analysis(br#"{"name": "Ada", "education": null}"#).unwrap();
        assert_eq!(result.name, "Ada");
        assert_eq!(result.email, "");
        assert_eq!(result.summary, "");
        assert!(result.education.is_empty());
        assert_eq!(normalize_skills(&result.skills), "");
    }

    #[test]
    fn test_ai_parsed_envelope_is_unwrapped() {
        let body = br#"{
            "extracted_text_snippet": "Ada Lovelace ...",
            "ai_parsed": {
                "summary": "Mathematician",
                "experience": [{"title": "Analyst", "company": "Analytical Engine"}]
            }
        }"#;
        let result = parse_analysis(body).unwrap();
        assert_eq!(result.summary, "Mathematician");
        assert_eq!(result.experience.len(), 1);
        assert_eq!(result.experience[0].company, "Analytical Engine");
        assert_eq!(result.experience[0].duration, "");
    }

    #[test]
    fn test_non_object_body_is_rejected() {
        assert!(parse_analysis(b"not json").is_err());
        assert!(parse_analysis(br#""just text""#).is_err());
        assert!(parse_analysis(b"[]").is_err());
        assert!(parse_analysis(b"null").is_err());
    }

    #[test]
    fn test_malformed_ai_parsed_is_an_error() {
        assert!(parse_analysis(br#"{"ai_parsed": {"name": "Ada", "skills": 42}}"#).is_err());
        assert!(parse_analysis(br#"{"ai_parsed": {"education": "none"}}"#).is_err());
        assert!(parse_analysis(br#"{"ai_parsed": null}"#).is_err());
        assert!(parse_analysis(br#"{"ai_parsed": []}"#).is_err());
    }
}
