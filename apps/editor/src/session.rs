//! One user's editing session: the draft store, the section navigator, and
//! the save flow through a [`ResumeGateway`].
//!
//! The first successful save creates the document; later saves update it
//! one section at a time. Gateway failures never roll back the draft: they
//! are logged and recorded as [`Notice`]s for the UI to show.

use std::path::{Path, PathBuf};

use resume::auth::Credential;
use resume::export::{export_file_name, render_markdown};
use resume::{FieldError, ResumeDraft, ResumePatch, Section};
use tracing::{info, warn};

use crate::command::DraftCommand;
use crate::gateway::{GatewayError, ResumeGateway};
use crate::navigator::SectionNavigator;
use crate::store::{DraftError, DraftStore};

/// A user-visible message produced by a session operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// No credential: the operation was aborted before any request.
    AuthMissing,
    /// The server rejected the save; the draft keeps the user's input.
    ValidationFailed(Vec<FieldError>),
    /// Network or server failure.
    RequestFailed(String),
    Saved(Section),
    Deleted,
    Exported(PathBuf),
}

impl Notice {
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Notice::AuthMissing | Notice::ValidationFailed(_) | Notice::RequestFailed(_)
        )
    }
}

pub struct EditorSession<G> {
    gateway: G,
    credential: Option<Credential>,
    store: DraftStore,
    navigator: SectionNavigator,
    resume_exists: bool,
    notices: Vec<Notice>,
}

impl<G: ResumeGateway> EditorSession<G> {
    pub fn new(gateway: G, credential: Option<Credential>) -> Self {
        Self {
            gateway,
            credential,
            store: DraftStore::new(),
            navigator: SectionNavigator::new(),
            resume_exists: false,
            notices: Vec::new(),
        }
    }

    /// Builds a session from a raw bearer token. A malformed token is treated
    /// as no credential.
    pub fn with_token(gateway: G, token: Option<&str>) -> Self {
        let credential = token.and_then(|t| match Credential::parse(t) {
            Ok(credential) => Some(credential),
            Err(e) => {
                warn!("Ignoring unusable credential: {e}");
                None
            }
        });
        Self::new(gateway, credential)
    }

    pub fn draft(&self) -> &ResumeDraft {
        self.store.draft()
    }

    pub fn store(&self) -> &DraftStore {
        &self.store
    }

    pub fn current_section(&self) -> Section {
        self.navigator.current()
    }

    pub fn resume_exists(&self) -> bool {
        self.resume_exists
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Local mutation only; nothing is sent until a save.
    pub fn apply(&mut self, command: DraftCommand) -> Result<(), DraftError> {
        self.store.apply(command)
    }

    /// Sidebar navigation. Does not save.
    pub fn jump(&mut self, section: Section) -> Section {
        self.navigator.jump(section)
    }

    /// Fetches the user's stored document, if any, into the draft.
    pub async fn load(&mut self) {
        let Some(credential) = self.credential.clone() else {
            self.notices.push(Notice::AuthMissing);
            return;
        };

        match self.gateway.fetch(&credential).await {
            Ok(Some(document)) => {
                info!("Loaded resume {} for user {}", document.id, document.user_id);
                self.store.replace(document.draft);
                self.resume_exists = true;
            }
            Ok(None) | Err(GatewayError::NotFound) => {
                info!("No stored resume for user {}", credential.user_id());
                self.resume_exists = false;
            }
            Err(e) => self.report("load resume", e),
        }
    }

    /// Saves one section: creates the document on the first save, updates it
    /// afterwards. Returns whether the save succeeded.
    pub async fn save_section(&mut self, section: Section) -> bool {
        let Some(credential) = self.credential.clone() else {
            self.notices.push(Notice::AuthMissing);
            return false;
        };
        let patch = ResumePatch::for_section(self.store.draft(), section);

        let result = if self.resume_exists {
            self.gateway.update(&credential, &patch).await
        } else {
            match self.gateway.create(&credential, &patch).await {
                // Created elsewhere since our last fetch; merge into it instead.
                Err(GatewayError::Conflict(_)) => {
                    warn!("Resume already exists for user {}; updating", credential.user_id());
                    self.resume_exists = true;
                    self.gateway.update(&credential, &patch).await
                }
                other => other,
            }
        };

        match result {
            Ok(document) => {
                info!("Saved {section} for user {}", document.user_id);
                self.resume_exists = true;
                self.notices.push(Notice::Saved(section));
                true
            }
            Err(e) => {
                self.report(&format!("save {section}"), e);
                false
            }
        }
    }

    /// Saves the current section, then moves to the next one whether or not
    /// the save went through.
    pub async fn save_and_continue(&mut self) -> bool {
        let saved = self.save_section(self.navigator.current()).await;
        self.navigator.advance();
        saved
    }

    /// Deletes the stored document and resets the draft to empty defaults.
    pub async fn delete(&mut self) -> bool {
        let Some(credential) = self.credential.clone() else {
            self.notices.push(Notice::AuthMissing);
            return false;
        };

        match self.gateway.delete(&credential).await {
            Ok(()) | Err(GatewayError::NotFound) => {
                info!("Deleted resume for user {}", credential.user_id());
                self.store.reset();
                self.navigator.reset();
                self.resume_exists = false;
                self.notices.push(Notice::Deleted);
                true
            }
            Err(e) => {
                self.report("delete resume", e);
                false
            }
        }
    }

    /// The rendered document for the current draft.
    pub fn preview(&self) -> String {
        render_markdown(self.store.draft())
    }

    /// Writes the preview into `dir` and returns the file path.
    pub async fn export_to(&mut self, dir: &Path) -> std::io::Result<PathBuf> {
        let path = dir.join(export_file_name(&self.store.draft().basic_info));
        if let Err(e) = tokio::fs::write(&path, self.preview()).await {
            warn!("Failed to export resume to {}: {e}", path.display());
            self.notices.push(Notice::RequestFailed(format!(
                "Could not export resume to {}: {e}",
                path.display()
            )));
            return Err(e);
        }
        info!("Exported resume to {}", path.display());
        self.notices.push(Notice::Exported(path.clone()));
        Ok(path)
    }

    fn report(&mut self, action: &str, err: GatewayError) {
        warn!("Failed to {action}: {err}");
        let notice = match err {
            GatewayError::Validation(errors) => Notice::ValidationFailed(errors),
            GatewayError::Unauthorized => Notice::AuthMissing,
            other => Notice::RequestFailed(format!("Could not {action}: {other}")),
        };
        self.notices.push(notice);
    }
}
