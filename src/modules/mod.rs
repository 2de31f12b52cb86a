pub mod analytics;
pub mod application;
