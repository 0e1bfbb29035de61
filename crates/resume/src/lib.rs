//! Shared resume domain: the draft record, its sections, the validation rule
//! sets applied before persistence, credential claims and document export.

pub mod auth;
pub mod export;
pub mod model;
pub mod section;
pub mod validation;

pub use model::{
    BasicInfo, EducationEntry, ResumeDocument, ResumeDraft, ResumePatch, Skills,
    WorkExperienceEntry,
};
pub use section::{
    BasicInfoField, EducationField, EntrySection, FieldRef, ListSection, ListTarget, Section,
    SkillCategory, WorkExperienceField,
};
pub use validation::{validate, FieldError, Mode};
