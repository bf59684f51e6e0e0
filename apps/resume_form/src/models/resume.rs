use serde::{Deserialize, Serialize};

use super::string_or_empty;

/// Top-level profile fields of the form. Everything is trimmed on collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub summary: String,
    pub skills: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub degree: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub institution: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub company: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub duration: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub description: String,
}

/// Everything `/generate` needs. Built fresh from the form for every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumePayload {
    pub profile: ProfileForm,
    pub education: Vec<EducationEntry>,
    pub experience: Vec<ExperienceEntry>,
}

impl ResumePayload {
    pub fn education_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.education)
    }

    pub fn experience_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.experience)
    }

    pub fn download_filename(&self) -> String {
        download_filename(&self.profile.name)
    }
}

/// `Ada  Lovelace` -> `Ada_Lovelace_resume.docx`
pub fn download_filename(name: &str) -> String {
    let stem = name.split_whitespace().collect::<Vec<_>>().join("_");
    format!("{stem}_resume.docx")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Purpose {
    Resume,
    General,
}

impl Purpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Purpose::Resume => "resume",
            Purpose::General => "general",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnhanceRequest {
    pub text: String,
    pub purpose: Purpose,
}
