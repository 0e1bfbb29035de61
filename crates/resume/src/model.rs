use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::section::{
    BasicInfoField, EducationField, ListSection, Section, SkillCategory, WorkExperienceField,
};

// ────────────────────────────────────────────────────────────────────────────
// Draft record
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub linkedin: String,
    #[serde(default)]
    pub github: String,
    #[serde(default)]
    pub objective: String,
}

impl BasicInfo {
    pub fn field_mut(&mut self, field: BasicInfoField) -> &mut String {
        match field {
            BasicInfoField::Name => &mut self.name,
            BasicInfoField::Contact => &mut self.contact,
            BasicInfoField::Address => &mut self.address,
            BasicInfoField::Email => &mut self.email,
            BasicInfoField::Linkedin => &mut self.linkedin,
            BasicInfoField::Github => &mut self.github,
            BasicInfoField::Objective => &mut self.objective,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub institute: String,
    #[serde(default)]
    pub field_of_study: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    /// Decimal text; numeric JSON values are accepted and kept as written.
    #[serde(
        default,
        deserialize_with = "lenient_decimal",
        skip_serializing_if = "Option::is_none"
    )]
    pub cgpa: Option<String>,
}

impl EducationEntry {
    pub fn set(&mut self, field: EducationField, value: String) {
        match field {
            EducationField::Degree => self.degree = value,
            EducationField::Institute => self.institute = value,
            EducationField::FieldOfStudy => self.field_of_study = value,
            EducationField::Location => self.location = value,
            EducationField::StartDate => self.start_date = value,
            EducationField::EndDate => self.end_date = value,
            EducationField::Cgpa => {
                self.cgpa = if value.trim().is_empty() {
                    None
                } else {
                    Some(value)
                }
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkExperienceEntry {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub designation: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
}

impl WorkExperienceEntry {
    pub fn field_mut(&mut self, field: WorkExperienceField) -> &mut String {
        match field {
            WorkExperienceField::Company => &mut self.company,
            WorkExperienceField::Designation => &mut self.designation,
            WorkExperienceField::StartDate => &mut self.start_date,
            WorkExperienceField::EndDate => &mut self.end_date,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skills {
    #[serde(default)]
    pub technical: Vec<String>,
    #[serde(default)]
    pub soft: Vec<String>,
    #[serde(default)]
    pub additional: Vec<String>,
}

impl Skills {
    pub fn category(&self, category: SkillCategory) -> &Vec<String> {
        match category {
            SkillCategory::Technical => &self.technical,
            SkillCategory::Soft => &self.soft,
            SkillCategory::Additional => &self.additional,
        }
    }

    pub fn category_mut(&mut self, category: SkillCategory) -> &mut Vec<String> {
        match category {
            SkillCategory::Technical => &mut self.technical,
            SkillCategory::Soft => &mut self.soft,
            SkillCategory::Additional => &mut self.additional,
        }
    }
}

/// The resume in progress. One per user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeDraft {
    #[serde(default)]
    pub basic_info: BasicInfo,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub work_experience: Vec<WorkExperienceEntry>,
    #[serde(default)]
    pub skills: Skills,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub projects: Vec<String>,
    #[serde(default)]
    pub extracurricular: Vec<String>,
    #[serde(default)]
    pub leadership: Vec<String>,
}

impl ResumeDraft {
    pub fn list(&self, section: ListSection) -> &Vec<String> {
        match section {
            ListSection::Achievements => &self.achievements,
            ListSection::Projects => &self.projects,
            ListSection::Extracurricular => &self.extracurricular,
            ListSection::Leadership => &self.leadership,
        }
    }

    pub fn list_mut(&mut self, section: ListSection) -> &mut Vec<String> {
        match section {
            ListSection::Achievements => &mut self.achievements,
            ListSection::Projects => &mut self.projects,
            ListSection::Extracurricular => &mut self.extracurricular,
            ListSection::Leadership => &mut self.leadership,
        }
    }

    /// Replaces every section supplied by `patch`; the rest stay as they are.
    pub fn apply_patch(&mut self, patch: ResumePatch) {
        let ResumePatch {
            basic_info,
            education,
            work_experience,
            skills,
            achievements,
            projects,
            extracurricular,
            leadership,
        } = patch;

        if let Some(v) = basic_info {
            self.basic_info = v;
        }
        if let Some(v) = education {
            self.education = v;
        }
        if let Some(v) = work_experience {
            self.work_experience = v;
        }
        if let Some(v) = skills {
            self.skills = v;
        }
        if let Some(v) = achievements {
            self.achievements = v;
        }
        if let Some(v) = projects {
            self.projects = v;
        }
        if let Some(v) = extracurricular {
            self.extracurricular = v;
        }
        if let Some(v) = leadership {
            self.leadership = v;
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Patches and stored documents
// ────────────────────────────────────────────────────────────────────────────

/// A partial draft as carried by POST/PUT bodies. Unknown keys (such as
/// `userId`) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic_info: Option<BasicInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<Vec<EducationEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_experience: Option<Vec<WorkExperienceEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Skills>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub achievements: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracurricular: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leadership: Option<Vec<String>>,
}

impl ResumePatch {
    /// A patch carrying exactly one section copied from `draft`.
    pub fn for_section(draft: &ResumeDraft, section: Section) -> Self {
        let mut patch = ResumePatch::default();
        match section {
            Section::BasicInfo => patch.basic_info = Some(draft.basic_info.clone()),
            Section::Education => patch.education = Some(draft.education.clone()),
            Section::WorkExperience => {
                patch.work_experience = Some(draft.work_experience.clone())
            }
            Section::Skills => patch.skills = Some(draft.skills.clone()),
            Section::Achievements => patch.achievements = Some(draft.achievements.clone()),
            Section::Projects => patch.projects = Some(draft.projects.clone()),
            Section::Extracurricular => {
                patch.extracurricular = Some(draft.extracurricular.clone())
            }
            Section::Leadership => patch.leadership = Some(draft.leadership.clone()),
        }
        patch
    }

    /// Sections this patch supplies, in editor order.
    pub fn sections(&self) -> Vec<Section> {
        let present = [
            self.basic_info.is_some(),
            self.education.is_some(),
            self.work_experience.is_some(),
            self.skills.is_some(),
            self.achievements.is_some(),
            self.projects.is_some(),
            self.extracurricular.is_some(),
            self.leadership.is_some(),
        ];
        Section::ALL
            .into_iter()
            .zip(present)
            .filter_map(|(section, present)| present.then_some(section))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.sections().is_empty()
    }
}

/// A persisted draft as returned by the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeDocument {
    pub id: Uuid,
    pub user_id: String,
    #[serde(flatten)]
    pub draft: ResumeDraft,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        None => None,
        Some(Raw::Text(s)) if s.trim().is_empty() => None,
        Some(Raw::Text(s)) => Some(s),
        Some(Raw::Number(n)) => Some(n.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_draft_is_empty() {
        let draft = ResumeDraft::default();
        assert!(draft.basic_info.name.is_empty());
        assert!(draft.education.is_empty());
        assert!(draft.skills.technical.is_empty());
        assert!(draft.leadership.is_empty());
    }

    #[test]
    fn test_wire_names_are_camel_case() {
        let mut draft = ResumeDraft::default();
        draft.education.push(EducationEntry {
            field_of_study: "CS".to_string(),
            ..Default::default()
        });
        let value = serde_json::to_value(&draft).unwrap();
        assert!(value.get("basicInfo").is_some());
        assert!(value.get("workExperience").is_some());
        assert_eq!(value["education"][0]["fieldOfStudy"], "CS");
        assert!(value["education"][0].get("cgpa").is_none());
    }

    #[test]
    fn test_cgpa_accepts_number_or_string() {
        let entry: EducationEntry = serde_json::from_value(json!({ "cgpa": 8.7 })).unwrap();
        assert_eq!(entry.cgpa.as_deref(), Some("8.7"));

        let entry: EducationEntry = serde_json::from_value(json!({ "cgpa": "9.1" })).unwrap();
        assert_eq!(entry.cgpa.as_deref(), Some("9.1"));

        let entry: EducationEntry = serde_json::from_value(json!({ "cgpa": "" })).unwrap();
        assert!(entry.cgpa.is_none());

        let entry: EducationEntry = serde_json::from_value(json!({ "cgpa": null })).unwrap();
        assert!(entry.cgpa.is_none());
    }

    #[test]
    fn test_apply_patch_replaces_only_supplied_sections() {
        let mut draft = ResumeDraft::default();
        draft.achievements = vec!["Won hackathon".to_string()];
        draft.basic_info.name = "Old".to_string();

        let patch: ResumePatch = serde_json::from_value(json!({
            "userId": "u1",
            "basicInfo": { "name": "New" }
        }))
        .unwrap();
        draft.apply_patch(patch);

        assert_eq!(draft.basic_info.name, "New");
        assert_eq!(draft.achievements, vec!["Won hackathon".to_string()]);
    }

    #[test]
    fn test_for_section_carries_one_section() {
        let mut draft = ResumeDraft::default();
        draft.projects = vec!["Compiler".to_string()];
        let patch = ResumePatch::for_section(&draft, Section::Projects);
        assert_eq!(patch.sections(), vec![Section::Projects]);

        let body = serde_json::to_value(&patch).unwrap();
        assert_eq!(body, json!({ "projects": ["Compiler"] }));
    }

    #[test]
    fn test_empty_patch() {
        assert!(ResumePatch::default().is_empty());
    }

    #[test]
    fn test_document_flattens_draft() {
        let doc = ResumeDocument {
            id: Uuid::new_v4(),
            user_id: "u1".to_string(),
            draft: ResumeDraft::default(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["userId"], "u1");
        assert!(value.get("basicInfo").is_some());
        assert!(value.get("draft").is_none());

        let back: ResumeDocument = serde_json::from_value(value).unwrap();
        assert_eq!(back.draft, doc.draft);
    }
}
