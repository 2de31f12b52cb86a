use chrono::{DateTime, Utc};

use crate::{
    api::error,
    modules::{
        analytics::schema::ApplicationStat,
        application::{model::InsertApplication, schema::ApplicationEntity},
    },
};

/// Durable application storage keyed by id. Mutations return `false` when no row
/// matched so the service can decide how to report it.
#[async_trait::async_trait]
pub trait ApplicationRepository {
    async fn create(&self, application: &InsertApplication) -> Result<(), error::SystemError>;

    /// Newest first.
    async fn list(&self, archived: bool) -> Result<Vec<ApplicationEntity>, error::SystemError>;

    async fn update_status(
        &self,
        id: &str,
        status: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, error::SystemError>;

    async fn archive(
        &self,
        id: &str,
        archived_at: DateTime<Utc>,
        auto_delete_date: DateTime<Utc>,
    ) -> Result<bool, error::SystemError>;

    async fn delete(&self, id: &str) -> Result<bool, error::SystemError>;

    /// Hard-deletes archived applications whose `auto_delete_date` is at or before `now`.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, error::SystemError>;

    /// Applications per `created_at` day, newest day first.
    async fn daily_counts(&self, limit: i64) -> Result<Vec<ApplicationStat>, error::SystemError>;
}
