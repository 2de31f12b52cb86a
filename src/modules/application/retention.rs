use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;

use crate::modules::application::service::ApplicationService;

/// Periodically hard-deletes archived applications whose scheduled delete date has
/// passed. Failures are logged and retried on the next tick.
pub fn spawn_retention_sweeper(service: ApplicationService, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            match service.purge_expired(Utc::now()).await {
                Ok(0) => log::debug!("Retention sweep: nothing to purge"),
                Ok(purged) => log::info!("Retention sweep purged {} archived application(s)", purged),
                Err(e) => log::error!("Retention sweep failed: {:?}", e),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::application::{
        model::InsertApplication, repository::ApplicationRepository,
        repository_memory::ApplicationRepositoryMemory,
    };
    use std::sync::Arc;

    #[tokio::test]
    async fn test_sweeper_purges_expired_on_first_tick() {
        let repo = Arc::new(ApplicationRepositoryMemory::new());
        let long_ago = Utc::now() - chrono::Duration::days(30);
        repo.create(&InsertApplication {
            id: "expired".to_string(),
            name: "Ana Vidic".to_string(),
            email: "ana@example.com".to_string(),
            phone: "+905551112233".to_string(),
            experience: String::new(),
            message: String::new(),
            files: "{}".to_string(),
            status: "rejected".to_string(),
            created_at: long_ago,
            updated_at: long_ago,
        })
        .await
        .unwrap();
        repo.archive("expired", long_ago, long_ago + chrono::Duration::days(14)).await.unwrap();

        let service = ApplicationService::with_dependencies(repo.clone());
        let handle = spawn_retention_sweeper(service, Duration::from_secs(3600));

        for _ in 0..50 {
            if repo.list(true).await.unwrap().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        handle.abort();

        assert!(repo.list(true).await.unwrap().is_empty());
    }
}
