//! Resume persistence: a pluggable, trait-based store keyed by user identity.
//!
//! `AppState` holds an `Arc<dyn ResumeStore>`, chosen at startup from config.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use resume::{ResumeDocument, ResumeDraft, ResumePatch};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("resume already exists for user {0}")]
    AlreadyExists(String),

    #[error("no resume for user {0}")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence contract for resume documents. At most one document per user.
#[async_trait]
pub trait ResumeStore: Send + Sync {
    /// The user's document, if one exists.
    async fn find_by_user(&self, user_id: &str) -> Result<Option<ResumeDocument>, StoreError>;

    /// Inserts a new document seeded from `patch`. Fails with `AlreadyExists`
    /// when the user already has one.
    async fn create(&self, user_id: &str, patch: ResumePatch)
        -> Result<ResumeDocument, StoreError>;

    /// Merges the sections supplied by `patch` into the stored document.
    async fn update(&self, user_id: &str, patch: ResumePatch)
        -> Result<ResumeDocument, StoreError>;

    async fn delete(&self, user_id: &str) -> Result<(), StoreError>;
}

// ────────────────────────────────────────────────────────────────────────────
// MemoryResumeStore
// ────────────────────────────────────────────────────────────────────────────

/// Process-local store. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryResumeStore {
    documents: RwLock<HashMap<String, ResumeDocument>>,
}

impl MemoryResumeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResumeStore for MemoryResumeStore {
    async fn find_by_user(&self, user_id: &str) -> Result<Option<ResumeDocument>, StoreError> {
        Ok(self.documents.read().await.get(user_id).cloned())
    }

    async fn create(
        &self,
        user_id: &str,
        patch: ResumePatch,
    ) -> Result<ResumeDocument, StoreError> {
        let mut documents = self.documents.write().await;
        if documents.contains_key(user_id) {
            return Err(StoreError::AlreadyExists(user_id.to_string()));
        }

        let mut draft = ResumeDraft::default();
        draft.apply_patch(patch);
        let now = Utc::now();
        let document = ResumeDocument {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            draft,
            created_at: now,
            updated_at: now,
        };
        documents.insert(user_id.to_string(), document.clone());
        Ok(document)
    }

    async fn update(
        &self,
        user_id: &str,
        patch: ResumePatch,
    ) -> Result<ResumeDocument, StoreError> {
        let mut documents = self.documents.write().await;
        let document = documents
            .get_mut(user_id)
            .ok_or_else(|| StoreError::NotFound(user_id.to_string()))?;
        document.draft.apply_patch(patch);
        document.updated_at = Utc::now();
        Ok(document.clone())
    }

    async fn delete(&self, user_id: &str) -> Result<(), StoreError> {
        self.documents
            .write()
            .await
            .remove(user_id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(user_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resume::Section;

    fn patch_with_projects(items: &[&str]) -> ResumePatch {
        ResumePatch {
            projects: Some(items.iter().map(|s| s.to_string()).collect()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_find_missing_returns_none() {
        let store = MemoryResumeStore::new();
        assert!(store.find_by_user("u1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_then_find() {
        let store = MemoryResumeStore::new();
        let created = store
            .create("u1", patch_with_projects(&["Compiler"]))
            .await
            .unwrap();
        assert_eq!(created.user_id, "u1");
        assert_eq!(created.draft.projects, vec!["Compiler".to_string()]);

        let found = store.find_by_user("u1").await.unwrap().unwrap();
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn test_second_create_conflicts() {
        let store = MemoryResumeStore::new();
        store.create("u1", patch_with_projects(&["A"])).await.unwrap();
        let err = store
            .create("u1", patch_with_projects(&["B"]))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_update_merges_single_section() {
        let store = MemoryResumeStore::new();
        store.create("u1", patch_with_projects(&["A"])).await.unwrap();

        let mut draft = ResumeDraft::default();
        draft.leadership = vec!["Captain".to_string()];
        let updated = store
            .update("u1", ResumePatch::for_section(&draft, Section::Leadership))
            .await
            .unwrap();

        assert_eq!(updated.draft.projects, vec!["A".to_string()]);
        assert_eq!(updated.draft.leadership, vec!["Captain".to_string()]);
        assert!(updated.updated_at >= updated.created_at);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = MemoryResumeStore::new();
        let err = store
            .update("ghost", ResumePatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryResumeStore::new();
        store.create("u1", patch_with_projects(&["A"])).await.unwrap();
        store.delete("u1").await.unwrap();
        assert!(store.find_by_user("u1").await.unwrap().is_none());
        assert!(matches!(
            store.delete("u1").await.unwrap_err(),
            StoreError::NotFound(_)
        ));
    }
}
