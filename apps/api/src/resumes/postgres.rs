use async_trait::async_trait;
use resume::{ResumeDocument, ResumeDraft, ResumePatch};
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::resume::ResumeRow;
use crate::resumes::store::{ResumeStore, StoreError};

/// Stores each user's draft as a JSONB document in `resumes`.
pub struct PgResumeStore {
    pool: PgPool,
}

impl PgResumeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResumeStore for PgResumeStore {
    async fn find_by_user(&self, user_id: &str) -> Result<Option<ResumeDocument>, StoreError> {
        let row = sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(ResumeDocument::from))
    }

    async fn create(
        &self,
        user_id: &str,
        patch: ResumePatch,
    ) -> Result<ResumeDocument, StoreError> {
        let mut draft = ResumeDraft::default();
        draft.apply_patch(patch);

        // The unique index on user_id turns a racing second insert into a no-op.
        let row = sqlx::query_as::<_, ResumeRow>(
            r#"
            INSERT INTO resumes (id, user_id, data)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(Json(&draft))
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::AlreadyExists(user_id.to_string()))?;

        info!("Created resume {} for user {user_id}", row.id);
        Ok(row.into())
    }

    async fn update(
        &self,
        user_id: &str,
        patch: ResumePatch,
    ) -> Result<ResumeDocument, StoreError> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, ResumeRow>(
            "SELECT * FROM resumes WHERE user_id = $1 FOR UPDATE",
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| StoreError::NotFound(user_id.to_string()))?;

        let sections = patch.sections();
        let mut draft = existing.data.0;
        draft.apply_patch(patch);

        let row = sqlx::query_as::<_, ResumeRow>(
            r#"
            UPDATE resumes
            SET data = $2, updated_at = now()
            WHERE user_id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(Json(&draft))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!("Updated resume {} for user {user_id}: {sections:?}", row.id);
        Ok(row.into())
    }

    async fn delete(&self, user_id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM resumes WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(user_id.to_string()));
        }
        info!("Deleted resume for user {user_id}");
        Ok(())
    }
}
