use std::sync::Arc;

use actix_web::web;

use crate::api::error;
use crate::modules::{
    analytics::{AnalyticsRepositoryMemory, AnalyticsRepositoryPg, AnalyticsService},
    application::{ApplicationRepositoryMemory, ApplicationRepositoryPg, ApplicationService},
};

/// Services shared by every worker.
#[derive(Clone)]
pub struct AppState {
    pub applications: ApplicationService,
    pub analytics: AnalyticsService,
}

impl AppState {
    pub fn postgres(pool: sqlx::PgPool) -> Self {
        let application_repo = Arc::new(ApplicationRepositoryPg::new(pool.clone()));
        let analytics_repo = Arc::new(AnalyticsRepositoryPg::new(pool));
        Self {
            applications: ApplicationService::with_dependencies(application_repo.clone()),
            analytics: AnalyticsService::with_dependencies(analytics_repo, application_repo),
        }
    }

    pub fn in_memory() -> Self {
        let application_repo = Arc::new(ApplicationRepositoryMemory::new());
        let analytics_repo = Arc::new(AnalyticsRepositoryMemory::new());
        Self {
            applications: ApplicationService::with_dependencies(application_repo.clone()),
            analytics: AnalyticsService::with_dependencies(analytics_repo, application_repo),
        }
    }

    /// Registers services, body limits and the `/api` routes.
    pub fn configure(&self, cfg: &mut web::ServiceConfig, max_payload_bytes: usize) {
        let json_config = web::JsonConfig::default()
            .limit(max_payload_bytes)
            .error_handler(|err, _req| error::Error::bad_request(err.to_string()).into());
        let query_config = web::QueryConfig::default()
            .error_handler(|err, _req| error::Error::bad_request(err.to_string()).into());

        cfg.app_data(json_config)
            .app_data(query_config)
            .app_data(web::Data::new(self.applications.clone()))
            .app_data(web::Data::new(self.analytics.clone()))
            .service(
                web::scope("/api")
                    .configure(crate::modules::application::route::configure)
                    .configure(crate::modules::analytics::route::configure),
            );
    }
}
