use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::template::{EntryGroup, GroupTemplate, EDUCATION_TEMPLATE, EXPERIENCE_TEMPLATE};

/// Single-value profile controls of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldId {
    Name,
    Email,
    Phone,
    Location,
    Summary,
    Skills,
}

impl FieldId {
    /// Required for generation, in the order they are checked.
    pub const REQUIRED: [FieldId; 4] = [
        FieldId::Name,
        FieldId::Email,
        FieldId::Phone,
        FieldId::Location,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldId::Name => "name",
            FieldId::Email => "email",
            FieldId::Phone => "phone",
            FieldId::Location => "location",
            FieldId::Summary => "summary",
            FieldId::Skills => "skills",
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(FieldId::Name),
            "email" => Ok(FieldId::Email),
            "phone" => Ok(FieldId::Phone),
            "location" => Ok(FieldId::Location),
            "summary" => Ok(FieldId::Summary),
            "skills" => Ok(FieldId::Skills),
            other => Err(format!("unknown form field '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKind {
    Education,
    Experience,
}

impl GroupKind {
    pub fn template(&self) -> &'static GroupTemplate {
        match self {
            GroupKind::Education => &EDUCATION_TEMPLATE,
            GroupKind::Experience => &EXPERIENCE_TEMPLATE,
        }
    }
}

impl FromStr for GroupKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "education" => Ok(GroupKind::Education),
            "experience" => Ok(GroupKind::Experience),
            other => Err(format!("unknown entry group kind '{other}'")),
        }
    }
}

/// Everything the user sees in the form. This is the single source of truth
/// between operations; nothing else keeps a copy of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormState {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub summary: String,
    pub skills: String,
    pub education: Vec<EntryGroup>,
    pub experience: Vec<EntryGroup>,
    /// Status line for analyze/review progress.
    pub status: String,
    /// Output area for the career review text.
    pub review: String,
}

impl FormState {
    pub fn field(&self, id: FieldId) -> &str {
        match id {
            FieldId::Name => &self.name,
            FieldId::Email => &self.email,
            FieldId::Phone => &self.phone,
            FieldId::Location => &self.location,
            FieldId::Summary => &self.summary,
            FieldId::Skills => &self.skills,
        }
    }

    pub fn set_field(&mut self, id: FieldId, value: impl Into<String>) {
        let slot = match id {
            FieldId::Name => &mut self.name,
            FieldId::Email => &mut self.email,
            FieldId::Phone => &mut self.phone,
            FieldId::Location => &mut self.location,
            FieldId::Summary => &mut self.summary,
            FieldId::Skills => &mut self.skills,
        };
        *slot = value.into();
    }

    pub fn groups(&self, kind: GroupKind) -> &[EntryGroup] {
        match kind {
            GroupKind::Education => &self.education,
            GroupKind::Experience => &self.experience,
        }
    }

    fn groups_mut(&mut self, kind: GroupKind) -> &mut Vec<EntryGroup> {
        match kind {
            GroupKind::Education => &mut self.education,
            GroupKind::Experience => &mut self.experience,
        }
    }

    /// Appends an empty group at the end, like the "add" buttons.
    pub fn add_group(&mut self, kind: GroupKind) -> usize {
        let groups = self.groups_mut(kind);
        groups.push(EntryGroup::blank(kind.template()));
        groups.len() - 1
    }

    /// Returns false when `index` is out of range.
    pub fn remove_group(&mut self, kind: GroupKind, index: usize) -> bool {
        let groups = self.groups_mut(kind);
        if index >= groups.len() {
            return false;
        }
        groups.remove(index);
        true
    }
}
