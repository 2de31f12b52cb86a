use chrono::{DateTime, Utc};
use sqlx::prelude::FromRow;

use crate::modules::application::model::{Application, FileMap};

/// `applications` row. `files` is stored as encoded JSON text.
#[derive(Debug, Clone, FromRow)]
pub struct ApplicationEntity {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub experience: String,
    pub message: String,
    pub files: Option<String>,
    pub status: String,
    pub archived: bool,
    pub archived_at: Option<DateTime<Utc>>,
    pub auto_delete_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

impl From<ApplicationEntity> for Application {
    fn from(entity: ApplicationEntity) -> Self {
        let files = entity.files.as_deref().map(FileMap::from_encoded).unwrap_or_default();

        Application {
            id: entity.id,
            name: entity.name,
            email: entity.email,
            phone: entity.phone,
            experience: non_empty(entity.experience),
            message: non_empty(entity.message),
            files,
            status: entity.status.into(),
            archived: entity.archived,
            archived_at: entity.archived_at,
            auto_delete_date: entity.auto_delete_date,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
