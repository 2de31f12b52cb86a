pub mod handle;
pub mod model;
pub mod repository;
pub mod repository_memory;
pub mod repository_pg;
pub mod route;
pub mod schema;
pub mod service;

pub use model::{AnalyticsEvent, AnalyticsSummary};
pub use repository::AnalyticsRepository;
pub use repository_memory::AnalyticsRepositoryMemory;
pub use repository_pg::AnalyticsRepositoryPg;
pub use service::AnalyticsService;
