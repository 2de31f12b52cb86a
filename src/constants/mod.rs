/// Hard cap for a single uploaded document. A file is rejected when `size > MAX_FILE_SIZE`.
pub const MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// Days between archival and the scheduled hard delete.
pub const ARCHIVE_RETENTION_DAYS: i64 = 14;

/// Number of daily rows returned by the analytics summary.
pub const ANALYTICS_HISTORY_DAYS: i64 = 30;

pub const DEFAULT_PLATFORM: &str = "unknown";

pub struct Env {
    pub database_url: Option<String>,
    pub frontend_url: String,
    pub ip: String,
    pub port: u16,
    pub max_payload_bytes: usize,
    pub retention_sweep_secs: u64,
}

impl Env {
    fn new() -> Self {
        let database_url = std::env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());

        let frontend_url =
            std::env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:5173".to_string());
        let ip = std::env::var("IP").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .expect("PORT must be a valid u16 integer");
        let max_payload_bytes = std::env::var("MAX_PAYLOAD_BYTES")
            .unwrap_or_else(|_| (64 * 1024 * 1024).to_string())
            .parse::<usize>()
            .expect("MAX_PAYLOAD_BYTES must be a valid usize integer");
        let retention_sweep_secs = std::env::var("RETENTION_SWEEP_SECS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse::<u64>()
            .expect("RETENTION_SWEEP_SECS must be a valid u64 integer");

        Env { database_url, frontend_url, ip, port, max_payload_bytes, retention_sweep_secs }
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}
