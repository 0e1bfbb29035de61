use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

/// One independently edited and saved part of the resume draft.
/// Declaration order is the order the editor walks through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Section {
    BasicInfo,
    Education,
    WorkExperience,
    Skills,
    Achievements,
    Projects,
    Extracurricular,
    Leadership,
}

impl Section {
    pub const ALL: [Section; 8] = [
        Section::BasicInfo,
        Section::Education,
        Section::WorkExperience,
        Section::Skills,
        Section::Achievements,
        Section::Projects,
        Section::Extracurricular,
        Section::Leadership,
    ];

    /// JSON key of the section in request bodies and stored documents.
    pub fn key(self) -> &'static str {
        match self {
            Section::BasicInfo => "basicInfo",
            Section::Education => "education",
            Section::WorkExperience => "workExperience",
            Section::Skills => "skills",
            Section::Achievements => "achievements",
            Section::Projects => "projects",
            Section::Extracurricular => "extracurricular",
            Section::Leadership => "leadership",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Section::BasicInfo => "Basic Info",
            Section::Education => "Education",
            Section::WorkExperience => "Work Experience",
            Section::Skills => "Skills",
            Section::Achievements => "Achievements",
            Section::Projects => "Projects",
            Section::Extracurricular => "Extracurricular Activities",
            Section::Leadership => "Leadership",
        }
    }

    /// The section after this one. Leadership has no successor and maps to itself.
    pub fn next(self) -> Section {
        let position = Section::ALL
            .iter()
            .position(|s| *s == self)
            .unwrap_or(Section::ALL.len() - 1);
        Section::ALL[(position + 1).min(Section::ALL.len() - 1)]
    }

    pub fn is_last(self) -> bool {
        self == Section::Leadership
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.key() == s)
            .ok_or_else(|| format!("unknown section '{s}'"))
    }
}

/// Sections holding an ordered sequence of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntrySection {
    Education,
    WorkExperience,
}

impl From<EntrySection> for Section {
    fn from(value: EntrySection) -> Self {
        match value {
            EntrySection::Education => Section::Education,
            EntrySection::WorkExperience => Section::WorkExperience,
        }
    }
}

/// Sections holding an ordered sequence of free-text items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListSection {
    Achievements,
    Projects,
    Extracurricular,
    Leadership,
}

impl From<ListSection> for Section {
    fn from(value: ListSection) -> Self {
        match value {
            ListSection::Achievements => Section::Achievements,
            ListSection::Projects => Section::Projects,
            ListSection::Extracurricular => Section::Extracurricular,
            ListSection::Leadership => Section::Leadership,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SkillCategory {
    Technical,
    Soft,
    Additional,
}

impl SkillCategory {
    pub fn key(self) -> &'static str {
        match self {
            SkillCategory::Technical => "technical",
            SkillCategory::Soft => "soft",
            SkillCategory::Additional => "additional",
        }
    }
}

/// Anything a free-text item can be appended to. Each target owns one
/// transient input buffer in the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListTarget {
    Skill(SkillCategory),
    List(ListSection),
}

impl ListTarget {
    pub fn section(self) -> Section {
        match self {
            ListTarget::Skill(_) => Section::Skills,
            ListTarget::List(list) => list.into(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Field identifiers
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BasicInfoField {
    Name,
    Contact,
    Address,
    Email,
    Linkedin,
    Github,
    Objective,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EducationField {
    Degree,
    Institute,
    FieldOfStudy,
    Location,
    StartDate,
    EndDate,
    Cgpa,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WorkExperienceField {
    Company,
    Designation,
    StartDate,
    EndDate,
}

/// Addresses one scalar field of the draft. Record-valued sections carry just
/// the field; sequence-valued sections also carry the entry index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "section", rename_all = "camelCase")]
pub enum FieldRef {
    BasicInfo {
        field: BasicInfoField,
    },
    Education {
        index: usize,
        field: EducationField,
    },
    WorkExperience {
        index: usize,
        field: WorkExperienceField,
    },
}

impl FieldRef {
    pub fn section(&self) -> Section {
        match self {
            FieldRef::BasicInfo { .. } => Section::BasicInfo,
            FieldRef::Education { .. } => Section::Education,
            FieldRef::WorkExperience { .. } => Section::WorkExperience,
        }
    }
}
