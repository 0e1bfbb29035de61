use resume::{EntrySection, FieldRef, ListTarget};
use serde::{Deserialize, Serialize};

/// One mutation of the draft. Commands are plain data so an editing session
/// can be recorded and replayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DraftCommand {
    /// Sets one scalar field.
    SetField { field: FieldRef, value: String },
    /// Appends an empty entry to a sequence-of-record section.
    AppendEntry { section: EntrySection },
    /// Removes an entry; later entries shift down by one.
    RemoveEntry { section: EntrySection, index: usize },
    /// Replaces the transient input buffer of a list target.
    SetInput { target: ListTarget, text: String },
    /// Appends `value` to a list target and clears its input buffer.
    AppendItem { target: ListTarget, value: String },
    /// Appends the current input buffer content, as the "Add" button does.
    CommitInput { target: ListTarget },
    RemoveItem { target: ListTarget, index: usize },
    /// Replaces the draft with empty defaults.
    Reset,
}
