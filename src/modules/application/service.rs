use chrono::{DateTime, Duration, SubsecRound, Utc};
use log::info;
use std::sync::Arc;

use crate::api::error;
use crate::constants::ARCHIVE_RETENTION_DAYS;
use crate::modules::application::{
    model::{
        Application, ApplicationRequest, ApplicationStatus, ArchiveResponse,
        CreateApplicationModel, InsertApplication,
    },
    repository::ApplicationRepository,
};

/// Outcome of [`ApplicationService::execute`], rendered by the handler.
#[derive(Debug)]
pub enum ApplicationOutcome {
    Created,
    StatusUpdated,
    Archived(ArchiveResponse),
    Deleted,
}

#[derive(Clone)]
pub struct ApplicationService {
    repo: Arc<dyn ApplicationRepository + Send + Sync>,
}

impl ApplicationService {
    pub fn with_dependencies(repo: Arc<dyn ApplicationRepository + Send + Sync>) -> Self {
        info!("ApplicationService initialized with dependencies");
        ApplicationService { repo }
    }

    pub async fn execute(
        &self,
        request: ApplicationRequest,
    ) -> Result<ApplicationOutcome, error::SystemError> {
        match request {
            ApplicationRequest::CreateApplication(model) => {
                self.create(model).await.map(|_| ApplicationOutcome::Created)
            }
            ApplicationRequest::UpdateStatus(model) => self
                .update_status(&model.id, ApplicationStatus::from(model.status))
                .await
                .map(|_| ApplicationOutcome::StatusUpdated),
            ApplicationRequest::Archive(model) => {
                self.archive(&model.id).await.map(ApplicationOutcome::Archived)
            }
            ApplicationRequest::Delete { id } => {
                self.delete(&id).await.map(|_| ApplicationOutcome::Deleted)
            }
        }
    }

    pub async fn create(&self, model: CreateApplicationModel) -> Result<(), error::SystemError> {
        let created_at = model.created_at.unwrap_or_else(Utc::now);
        let updated_at = model.updated_at.unwrap_or(created_at);

        let insert = InsertApplication {
            id: model.id,
            name: model.name,
            email: model.email,
            phone: model.phone,
            experience: model.experience.unwrap_or_default(),
            message: model.message.unwrap_or_default(),
            files: serde_json::to_string(&model.files)?,
            status: model.status.to_string(),
            created_at,
            updated_at,
        };

        self.repo.create(&insert).await?;
        info!("Application {} stored with {} file(s)", insert.id, model.files.total());
        Ok(())
    }

    pub async fn list(&self, archived: bool) -> Result<Vec<Application>, error::SystemError> {
        let rows = self.repo.list(archived).await?;
        Ok(rows.into_iter().map(Application::from).collect())
    }

    pub async fn update_status(
        &self,
        id: &str,
        status: ApplicationStatus,
    ) -> Result<(), error::SystemError> {
        if !self.repo.update_status(id, status.as_str(), Utc::now()).await? {
            return Err(error::SystemError::not_found("Application not found"));
        }
        info!("Application {} moved to {}", id, status);
        Ok(())
    }

    /// Soft-deletes the application and schedules its hard delete
    /// [`ARCHIVE_RETENTION_DAYS`] later. Timestamps are whole seconds.
    pub async fn archive(&self, id: &str) -> Result<ArchiveResponse, error::SystemError> {
        let archived_at = Utc::now().trunc_subsecs(0);
        let auto_delete_date = archived_at + Duration::days(ARCHIVE_RETENTION_DAYS);

        if !self.repo.archive(id, archived_at, auto_delete_date).await? {
            return Err(error::SystemError::not_found("Application not found"));
        }
        info!("Application {} archived, scheduled for deletion at {}", id, auto_delete_date);
        Ok(ArchiveResponse { archived_at, auto_delete_date })
    }

    pub async fn delete(&self, id: &str) -> Result<(), error::SystemError> {
        if !self.repo.delete(id).await? {
            return Err(error::SystemError::not_found("Application not found"));
        }
        info!("Application {} deleted", id);
        Ok(())
    }

    pub async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, error::SystemError> {
        self.repo.purge_expired(now).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::application::{
        model::FileMap, repository_memory::ApplicationRepositoryMemory,
    };

    fn service() -> ApplicationService {
        ApplicationService::with_dependencies(Arc::new(ApplicationRepositoryMemory::new()))
    }

    fn create_model(id: &str) -> CreateApplicationModel {
        CreateApplicationModel {
            id: id.to_string(),
            name: "Ana Vidic".to_string(),
            email: "ana@example.com".to_string(),
            phone: "+905551112233".to_string(),
            experience: Some("3 years".to_string()),
            message: None,
            files: FileMap::default(),
            status: ApplicationStatus::Pending,
            created_at: None,
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_create_then_list_round_trips_fields() {
        let service = service();
        service.create(create_model("app-1")).await.unwrap();

        let apps = service.list(false).await.unwrap();
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].id, "app-1");
        assert_eq!(apps[0].status, ApplicationStatus::Pending);
        assert_eq!(apps[0].experience.as_deref(), Some("3 years"));
        assert_eq!(apps[0].message, None);
        assert_eq!(apps[0].created_at, apps[0].updated_at);
    }

    #[tokio::test]
    async fn test_archive_schedules_delete_fourteen_days_later() {
        let service = service();
        service.create(create_model("app-1")).await.unwrap();

        let archived = service.archive("app-1").await.unwrap();
        assert_eq!(archived.auto_delete_date - archived.archived_at, Duration::days(14));
        assert_eq!(archived.archived_at.timestamp_subsec_nanos(), 0);

        assert!(service.list(false).await.unwrap().is_empty());
        let stored = service.list(true).await.unwrap();
        assert_eq!(stored[0].archived_at, Some(archived.archived_at));
        assert_eq!(stored[0].auto_delete_date, Some(archived.auto_delete_date));
        assert!(stored[0].archived);
        assert_eq!(stored[0].updated_at, archived.archived_at);
    }

    #[tokio::test]
    async fn test_update_status_refreshes_updated_at() {
        let service = service();
        let mut model = create_model("app-1");
        model.created_at = Some(Utc::now() - Duration::hours(1));
        service.create(model).await.unwrap();

        service.update_status("app-1", ApplicationStatus::Reviewed).await.unwrap();
        let app = &service.list(false).await.unwrap()[0];
        assert_eq!(app.status, ApplicationStatus::Reviewed);
        assert!(app.updated_at > app.created_at);
    }

    #[tokio::test]
    async fn test_missing_application_is_not_found() {
        let service = service();
        let err = service.update_status("nope", ApplicationStatus::Accepted).await.unwrap_err();
        assert!(matches!(err, error::SystemError::NotFound(_)));
        assert!(matches!(
            service.archive("nope").await.unwrap_err(),
            error::SystemError::NotFound(_)
        ));
        assert!(matches!(
            service.delete("nope").await.unwrap_err(),
            error::SystemError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_execute_dispatches_tagged_requests() {
        let service = service();
        let outcome =
            service.execute(ApplicationRequest::CreateApplication(create_model("x"))).await.unwrap();
        assert!(matches!(outcome, ApplicationOutcome::Created));

        let outcome =
            service.execute(ApplicationRequest::Delete { id: "x".to_string() }).await.unwrap();
        assert!(matches!(outcome, ApplicationOutcome::Deleted));
        assert!(service.list(false).await.unwrap().is_empty());
    }
}
