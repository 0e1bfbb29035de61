use chrono::{DateTime, Utc};
use resume::{ResumeDocument, ResumeDraft};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// One row of the `resumes` table. The draft lives in a JSONB column.
#[derive(Debug, Clone, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: String,
    pub data: Json<ResumeDraft>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ResumeRow> for ResumeDocument {
    fn from(row: ResumeRow) -> Self {
        ResumeDocument {
            id: row.id,
            user_id: row.user_id,
            draft: row.data.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
