//! Entry-group templates.
//!
//! A repeated entry group (one education or experience block) is described
//! once by a `GroupTemplate`. Rendering entries into groups and reading them
//! back both go through the template, so the control names live in one place.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::resume::{EducationEntry, ExperienceEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupTemplate {
    pub legend: &'static str,
    /// Control class names, in display order.
    pub fields: &'static [&'static str],
}

pub const EDUCATION_TEMPLATE: GroupTemplate = GroupTemplate {
    legend: "Education",
    fields: &["eduDegree", "eduInstitution", "eduYear"],
};

pub const EXPERIENCE_TEMPLATE: GroupTemplate = GroupTemplate {
    legend: "Experience",
    fields: &["expTitle", "expCompany", "expDuration", "expDescription"],
};

/// Values of one rendered group, keyed by control class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryGroup(BTreeMap<String, String>);

impl EntryGroup {
    /// A group with every control of `template` present and empty.
    pub fn blank(template: &GroupTemplate) -> Self {
        Self(
            template
                .fields
                .iter()
                .map(|class| (class.to_string(), String::new()))
                .collect(),
        )
    }

    /// Missing controls read as `""`.
    pub fn get(&self, class: &str) -> &str {
        self.0.get(class).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, class: &str, value: impl Into<String>) {
        self.0.insert(class.to_string(), value.into());
    }
}

/// An entry type that can be shown as an entry group.
pub trait GroupEntry: Default {
    const TEMPLATE: &'static GroupTemplate;

    fn value(&self, class: &str) -> &str;

    fn slot(&mut self, class: &str) -> Option<&mut String>;
}

impl GroupEntry for EducationEntry {
    const TEMPLATE: &'static GroupTemplate = &EDUCATION_TEMPLATE;

    fn value(&self, class: &str) -> &str {
        match class {
            "eduDegree" => &self.degree,
            "eduInstitution" => &self.institution,
            "eduYear" => &self.year,
            _ => "",
        }
    }

    fn slot(&mut self, class: &str) -> Option<&mut String> {
        match class {
            "eduDegree" => Some(&mut self.degree),
            "eduInstitution" => Some(&mut self.institution),
            "eduYear" => Some(&mut self.year),
            _ => None,
        }
    }
}

impl GroupEntry for ExperienceEntry {
    const TEMPLATE: &'static GroupTemplate = &EXPERIENCE_TEMPLATE;

    fn value(&self, class: &str) -> &str {
        match class {
            "expTitle" => &self.title,
            "expCompany" => &self.company,
            "expDuration" => &self.duration,
            "expDescription" => &self.description,
            _ => "",
        }
    }

    fn slot(&mut self, class: &str) -> Option<&mut String> {
        match class {
            "expTitle" => Some(&mut self.title),
            "expCompany" => Some(&mut self.company),
            "expDuration" => Some(&mut self.duration),
            "expDescription" => Some(&mut self.description),
            _ => None,
        }
    }
}

pub fn render_group<E: GroupEntry>(entry: &E) -> EntryGroup {
    let mut group = EntryGroup::blank(E::TEMPLATE);
    for class in E::TEMPLATE.fields {
        group.set(class, entry.value(class));
    }
    group
}

/// Renders one group per entry, in order.
pub fn render_groups<E: GroupEntry>(entries: &[E]) -> Vec<EntryGroup> {
    entries.iter().map(render_group::<E>).collect()
}

pub fn read_group<E: GroupEntry>(group: &EntryGroup) -> E {
    let mut entry = E::default();
    for class in E::TEMPLATE.fields {
        if let Some(slot) = entry.slot(class) {
            *slot = group.get(class).to_string();
        }
    }
    entry
}

pub fn read_groups<E: GroupEntry>(groups: &[EntryGroup]) -> Vec<E> {
    groups.iter().map(read_group::<E>).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_group_has_every_control() {
        let group = EntryGroup::blank(&EXPERIENCE_TEMPLATE);
        for class in EXPERIENCE_TEMPLATE.fields {
            assert_eq!(group.get(class), "");
        }
        assert_eq!(group.0.len(), 4);
    }

    #[test]
    fn test_rendered_group_uses_template_classes() {
        let entry = EducationEntry {
            degree: "BSc".to_string(),
            institution: "UCL".to_string(),
            year: String::new(),
        };
        let group = render_group(&entry);
        assert_eq!(group.get("eduDegree"), "BSc");
        assert_eq!(group.get("eduInstitution"), "UCL");
        assert_eq!(group.get("eduYear"), "");
    }

    #[test]
    fn test_partial_group_reads_missing_controls_as_empty() {
        let mut group = EntryGroup::default();
        group.set("expTitle", "Engineer");
        let entry: ExperienceEntry = read_group(&group);
        assert_eq!(entry.title, "Engineer");
        assert_eq!(entry.company, "");
        assert_eq!(entry.description, "");
    }

    #[test]
    fn test_unknown_controls_are_ignored() {
        let mut group = EntryGroup::blank(&EDUCATION_TEMPLATE);
        group.set("eduGpa", "4.0");
        let entry: EducationEntry = read_group(&group);
        assert_eq!(entry, EducationEntry::default());
    }
}
