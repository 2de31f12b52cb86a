pub mod handle;
pub mod model;
pub mod repository;
pub mod repository_memory;
pub mod repository_pg;
pub mod retention;
pub mod route;
pub mod schema;
pub mod service;

pub use model::{Application, ApplicationStatus, FileCategory, FileDescriptor, FileMap};
pub use repository::ApplicationRepository;
pub use repository_memory::ApplicationRepositoryMemory;
pub use repository_pg::ApplicationRepositoryPg;
pub use service::ApplicationService;
