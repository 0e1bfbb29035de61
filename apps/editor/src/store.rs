use std::collections::HashMap;

use resume::{
    EducationEntry, EntrySection, FieldRef, ListTarget, ResumeDraft, Section, WorkExperienceEntry,
};
use thiserror::Error;
use tracing::debug;

use crate::command::DraftCommand;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("{section} has no entry at index {index} (length {len})")]
    IndexOutOfRange {
        section: Section,
        index: usize,
        len: usize,
    },
}

/// The resume in progress plus the transient per-list input buffers.
/// Owned by one editing session; nothing here touches the network.
#[derive(Debug, Clone, Default)]
pub struct DraftStore {
    draft: ResumeDraft,
    inputs: HashMap<ListTarget, String>,
}

impl DraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_draft(draft: ResumeDraft) -> Self {
        Self {
            draft,
            inputs: HashMap::new(),
        }
    }

    pub fn draft(&self) -> &ResumeDraft {
        &self.draft
    }

    /// Current text of a list target's input buffer.
    pub fn input(&self, target: ListTarget) -> &str {
        self.inputs.get(&target).map(String::as_str).unwrap_or("")
    }

    /// Swaps in a draft fetched from the gateway. Input buffers are kept.
    pub fn replace(&mut self, draft: ResumeDraft) {
        self.draft = draft;
    }

    pub fn reset(&mut self) {
        self.draft = ResumeDraft::default();
        self.inputs.clear();
    }

    /// Applies one command. A failed command leaves the store untouched.
    pub fn apply(&mut self, command: DraftCommand) -> Result<(), DraftError> {
        debug!("Applying draft command {command:?}");
        match command {
            DraftCommand::SetField { field, value } => self.set_field(field, value),
            DraftCommand::AppendEntry { section } => {
                match section {
                    EntrySection::Education => self.draft.education.push(EducationEntry::default()),
                    EntrySection::WorkExperience => self
                        .draft
                        .work_experience
                        .push(WorkExperienceEntry::default()),
                }
                Ok(())
            }
            DraftCommand::RemoveEntry { section, index } => {
                let len = self.entry_len(section);
                if index >= len {
                    return Err(DraftError::IndexOutOfRange {
                        section: section.into(),
                        index,
                        len,
                    });
                }
                match section {
                    EntrySection::Education => {
                        self.draft.education.remove(index);
                    }
                    EntrySection::WorkExperience => {
                        self.draft.work_experience.remove(index);
                    }
                }
                Ok(())
            }
            DraftCommand::SetInput { target, text } => {
                self.inputs.insert(target, text);
                Ok(())
            }
            DraftCommand::AppendItem { target, value } => {
                self.append_item(target, &value);
                Ok(())
            }
            DraftCommand::CommitInput { target } => {
                let value = self.inputs.remove(&target).unwrap_or_default();
                self.append_item(target, &value);
                Ok(())
            }
            DraftCommand::RemoveItem { target, index } => {
                let items = self.items_mut(target);
                if index >= items.len() {
                    return Err(DraftError::IndexOutOfRange {
                        section: target.section(),
                        index,
                        len: items.len(),
                    });
                }
                items.remove(index);
                Ok(())
            }
            DraftCommand::Reset => {
                self.reset();
                Ok(())
            }
        }
    }

    /// Applies commands in order, stopping at the first failure.
    pub fn replay<I>(&mut self, commands: I) -> Result<(), DraftError>
    where
        I: IntoIterator<Item = DraftCommand>,
    {
        commands.into_iter().try_for_each(|command| self.apply(command))
    }

    fn set_field(&mut self, field: FieldRef, value: String) -> Result<(), DraftError> {
        match field {
            FieldRef::BasicInfo { field } => {
                *self.draft.basic_info.field_mut(field) = value;
            }
            FieldRef::Education { index, field } => {
                let len = self.draft.education.len();
                let entry = self.draft.education.get_mut(index).ok_or(
                    DraftError::IndexOutOfRange {
                        section: Section::Education,
                        index,
                        len,
                    },
                )?;
                entry.set(field, value);
            }
            FieldRef::WorkExperience { index, field } => {
                let len = self.draft.work_experience.len();
                let entry = self.draft.work_experience.get_mut(index).ok_or(
                    DraftError::IndexOutOfRange {
                        section: Section::WorkExperience,
                        index,
                        len,
                    },
                )?;
                *entry.field_mut(field) = value;
            }
        }
        Ok(())
    }

    /// Trims and appends; blanks are dropped and a skill already in its
    /// category is not added twice. The target's buffer is always cleared.
    fn append_item(&mut self, target: ListTarget, value: &str) {
        self.inputs.remove(&target);
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        let is_skill = matches!(target, ListTarget::Skill(_));
        let items = self.items_mut(target);
        if is_skill && items.iter().any(|existing| existing == value) {
            return;
        }
        items.push(value.to_string());
    }

    fn items_mut(&mut self, target: ListTarget) -> &mut Vec<String> {
        match target {
            ListTarget::Skill(category) => self.draft.skills.category_mut(category),
            ListTarget::List(list) => self.draft.list_mut(list),
        }
    }

    fn entry_len(&self, section: EntrySection) -> usize {
        match section {
            EntrySection::Education => self.draft.education.len(),
            EntrySection::WorkExperience => self.draft.work_experience.len(),
        }
    }
}
