use std::{collections::BTreeMap, sync::Arc};

use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::RwLock;

use crate::{
    api::error,
    modules::{
        analytics::schema::ApplicationStat,
        application::{
            model::InsertApplication, repository::ApplicationRepository,
            schema::ApplicationEntity,
        },
    },
};

/// In-process store used when no database is configured, and by tests.
#[derive(Clone, Default)]
pub struct ApplicationRepositoryMemory {
    rows: Arc<RwLock<Vec<ApplicationEntity>>>,
}

impl ApplicationRepositoryMemory {
    pub fn new() -> Self {
        Self::default()
    }

    async fn modify<F>(&self, id: &str, f: F) -> bool
    where
        F: FnOnce(&mut ApplicationEntity),
    {
        let mut rows = self.rows.write().await;
        match rows.iter_mut().find(|row| row.id == id) {
            Some(row) => {
                f(row);
                true
            }
            None => false,
        }
    }
}

#[async_trait::async_trait]
impl ApplicationRepository for ApplicationRepositoryMemory {
    async fn create(&self, application: &InsertApplication) -> Result<(), error::SystemError> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|row| row.id == application.id) {
            return Err(error::SystemError::conflict("Application already exists"));
        }

        rows.push(ApplicationEntity {
            id: application.id.clone(),
            name: application.name.clone(),
            email: application.email.clone(),
            phone: application.phone.clone(),
            experience: application.experience.clone(),
            message: application.message.clone(),
            files: Some(application.files.clone()),
            status: application.status.clone(),
            archived: false,
            archived_at: None,
            auto_delete_date: None,
            created_at: application.created_at,
            updated_at: application.updated_at,
        });
        Ok(())
    }

    async fn list(&self, archived: bool) -> Result<Vec<ApplicationEntity>, error::SystemError> {
        let rows = self.rows.read().await;
        let mut matching: Vec<ApplicationEntity> =
            rows.iter().filter(|row| row.archived == archived).cloned().collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    async fn update_status(
        &self,
        id: &str,
        status: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, error::SystemError> {
        Ok(self
            .modify(id, |row| {
                row.status = status.to_string();
                row.updated_at = updated_at;
            })
            .await)
    }

    async fn archive(
        &self,
        id: &str,
        archived_at: DateTime<Utc>,
        auto_delete_date: DateTime<Utc>,
    ) -> Result<bool, error::SystemError> {
        Ok(self
            .modify(id, |row| {
                row.archived = true;
                row.archived_at = Some(archived_at);
                row.auto_delete_date = Some(auto_delete_date);
                row.updated_at = archived_at;
            })
            .await)
    }

    async fn delete(&self, id: &str) -> Result<bool, error::SystemError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|row| row.id != id);
        Ok(rows.len() < before)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, error::SystemError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|row| !(row.archived && row.auto_delete_date.is_some_and(|at| at <= now)));
        Ok((before - rows.len()) as u64)
    }

    async fn daily_counts(&self, limit: i64) -> Result<Vec<ApplicationStat>, error::SystemError> {
        let rows = self.rows.read().await;
        let mut per_day: BTreeMap<NaiveDate, i64> = BTreeMap::new();
        for row in rows.iter() {
            *per_day.entry(row.created_at.date_naive()).or_default() += 1;
        }

        Ok(per_day
            .into_iter()
            .rev()
            .take(limit.max(0) as usize)
            .map(|(date, count)| ApplicationStat { date, count })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn insert(id: &str, created_at: DateTime<Utc>) -> InsertApplication {
        InsertApplication {
            id: id.to_string(),
            name: "Ana Vidic".to_string(),
            email: "ana@example.com".to_string(),
            phone: "+905551112233".to_string(),
            experience: String::new(),
            message: String::new(),
            files: "{}".to_string(),
            status: "pending".to_string(),
            created_at,
            updated_at: created_at,
        }
    }

    #[tokio::test]
    async fn test_duplicate_id_conflicts() {
        let repo = ApplicationRepositoryMemory::new();
        let now = Utc::now();
        repo.create(&insert("a1", now)).await.unwrap();

        let err = repo.create(&insert("a1", now)).await.unwrap_err();
        assert!(matches!(err, error::SystemError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_list_filters_archived_and_orders_newest_first() {
        let repo = ApplicationRepositoryMemory::new();
        let now = Utc::now();
        repo.create(&insert("old", now - Duration::hours(2))).await.unwrap();
        repo.create(&insert("new", now)).await.unwrap();
        repo.create(&insert("gone", now - Duration::hours(1))).await.unwrap();
        assert!(repo.archive("gone", now, now + Duration::days(14)).await.unwrap());

        let active: Vec<String> = repo.list(false).await.unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(active, ["new", "old"]);

        let archived = repo.list(true).await.unwrap();
        assert_eq!(archived.len(), 1);
        assert_eq!(archived[0].id, "gone");
    }

    #[tokio::test]
    async fn test_mutations_report_missing_rows() {
        let repo = ApplicationRepositoryMemory::new();
        let now = Utc::now();
        assert!(!repo.update_status("missing", "reviewed", now).await.unwrap());
        assert!(!repo.archive("missing", now, now).await.unwrap());
        assert!(!repo.delete("missing").await.unwrap());
    }

    #[tokio::test]
    async fn test_purge_only_removes_expired_archives() {
        let repo = ApplicationRepositoryMemory::new();
        let now = Utc::now();
        for id in ["expired", "scheduled", "active"] {
            repo.create(&insert(id, now - Duration::days(20))).await.unwrap();
        }
        repo.archive("expired", now - Duration::days(15), now - Duration::days(1)).await.unwrap();
        repo.archive("scheduled", now, now + Duration::days(14)).await.unwrap();

        assert_eq!(repo.purge_expired(now).await.unwrap(), 1);
        assert_eq!(repo.list(false).await.unwrap().len(), 1);
        assert_eq!(repo.list(true).await.unwrap()[0].id, "scheduled");
    }

    #[tokio::test]
    async fn test_daily_counts_group_by_creation_day() {
        let repo = ApplicationRepositoryMemory::new();
        let now = Utc::now();
        repo.create(&insert("a", now)).await.unwrap();
        repo.create(&insert("b", now)).await.unwrap();
        repo.create(&insert("c", now - Duration::days(1))).await.unwrap();

        let stats = repo.daily_counts(30).await.unwrap();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0], ApplicationStat { date: now.date_naive(), count: 2 });
        assert_eq!(stats[1].count, 1);

        assert_eq!(repo.daily_counts(1).await.unwrap().len(), 1);
    }
}
