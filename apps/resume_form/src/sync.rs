//! Pure form <-> payload mapping.
//!
//! Every function here takes the form by value or reference and returns new
//! data; the controller does the I/O around them.

use crate::errors::ValidationError;
use crate::form::template::{read_groups, render_groups};
use crate::form::{FieldId, FormState};
use crate::models::analysis::{normalize_skills, AnalysisResult};
use crate::models::response::EnhanceResponse;
use crate::models::resume::{
    EducationEntry, EnhanceRequest, ExperienceEntry, ProfileForm, Purpose, ResumePayload,
};

/// Trimmed profile fields. Fails on the first empty required field.
pub fn collect_profile(form: &FormState) -> Result<ProfileForm, ValidationError> {
    for id in FieldId::REQUIRED {
        if form.field(id).trim().is_empty() {
            return Err(ValidationError::MissingField(id));
        }
    }

    Ok(ProfileForm {
        name: form.name.trim().to_string(),
        email: form.email.trim().to_string(),
        phone: form.phone.trim().to_string(),
        location: form.location.trim().to_string(),
        summary: form.summary.trim().to_string(),
        skills: form.skills.trim().to_string(),
    })
}

pub fn collect_education(form: &FormState) -> Vec<EducationEntry> {
    read_groups(&form.education)
}

pub fn collect_experience(form: &FormState) -> Vec<ExperienceEntry> {
    read_groups(&form.experience)
}

pub fn collect_payload(form: &FormState) -> Result<ResumePayload, ValidationError> {
    Ok(ResumePayload {
        profile: collect_profile(form)?,
        education: collect_education(form),
        experience: collect_experience(form),
    })
}

/// The summary is rewritten as resume prose; everything else gets a general
/// grammar pass.
pub fn purpose_for(field: FieldId) -> Purpose {
    match field {
        FieldId::Summary => Purpose::Resume,
        _ => Purpose::General,
    }
}

pub fn enhance_request(form: &FormState, field: FieldId) -> Result<EnhanceRequest, ValidationError> {
    let text = form.field(field).trim();
    if text.is_empty() {
        return Err(ValidationError::EmptyInput(field.to_string()));
    }
    Ok(EnhanceRequest {
        text: text.to_string(),
        purpose: purpose_for(field),
    })
}

/// Improved text if the backend produced some, otherwise `original`.
pub fn apply_enhancement(original: &str, response: EnhanceResponse) -> String {
    match response.improved {
        Some(improved) if !improved.trim().is_empty() => improved,
        _ => original.to_string(),
    }
}

/// Writes an analysis result into the form. Profile fields are overwritten
/// (absent ones become empty) and both entry-group lists are replaced.
pub fn apply_analysis(mut form: FormState, result: AnalysisResult) -> FormState {
    form.skills = normalize_skills(&result.skills);
    form.name = result.name;
    form.email = result.email;
    form.phone = result.phone;
    form.location = result.location;
    form.summary = result.summary;
    form.education = render_groups(&result.education);
    form.experience = render_groups(&result.experience);
    form
}
