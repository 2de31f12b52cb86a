use std::{
    collections::BTreeMap,
    fs::OpenOptions,
    io::{self, ErrorKind, Write},
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tokio::sync::Mutex;

use crate::modules::application::model::Application;

#[derive(thiserror::Error, Debug)]
pub enum FallbackError {
    #[error("Fallback store IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Fallback store is corrupt: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything parked locally while the backend was unreachable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocalSnapshot {
    pub applications: Vec<Application>,
    pub page_views: BTreeMap<NaiveDate, u64>,
    pub social_analytics: BTreeMap<NaiveDate, BTreeMap<String, u64>>,
}

impl LocalSnapshot {
    fn bump_page_view(&mut self, date: NaiveDate) -> u64 {
        let views = self.page_views.entry(date).or_default();
        *views += 1;
        *views
    }

    fn bump_social_click(&mut self, date: NaiveDate, platform: &str) -> u64 {
        let clicks =
            self.social_analytics.entry(date).or_default().entry(platform.to_string()).or_default();
        *clicks += 1;
        *clicks
    }
}

/// Local durable substitute for the backend. Each mutation is one atomic
/// read-modify-write, so concurrent callers never lose or corrupt entries.
#[async_trait::async_trait]
pub trait FallbackStore: Send + Sync {
    async fn append_application(&self, application: &Application) -> Result<(), FallbackError>;

    async fn applications(&self) -> Result<Vec<Application>, FallbackError>;

    async fn increment_page_view(&self, date: NaiveDate) -> Result<u64, FallbackError>;

    async fn increment_social_click(
        &self,
        date: NaiveDate,
        platform: &str,
    ) -> Result<u64, FallbackError>;

    async fn snapshot(&self) -> Result<LocalSnapshot, FallbackError>;
}

/// Keeps the snapshot as a single JSON document on disk. Mutations hold an exclusive
/// lock on `<path>.lock`, so several stores or processes sharing the file serialize
/// their read-modify-write cycles.
pub struct JsonFileFallbackStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileFallbackStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Mutex::new(()) }
    }

    /// Runs `f` on a blocking thread while holding the file lock.
    async fn locked<R, F>(&self, f: F) -> Result<R, FallbackError>
    where
        R: Send + 'static,
        F: FnOnce(&Path) -> Result<R, FallbackError> + Send + 'static,
    {
        let _guard = self.lock.lock().await;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            let dir = parent_dir(&path);
            std::fs::create_dir_all(dir)?;

            let mut lock_path = path.clone().into_os_string();
            lock_path.push(".lock");
            let lock_file = OpenOptions::new()
                .create(true)
                .truncate(false)
                .read(true)
                .write(true)
                .open(PathBuf::from(lock_path))?;
            let mut lock = fd_lock::RwLock::new(lock_file);
            let _held = lock.write()?;

            f(&path)
        })
        .await
        .map_err(|e| FallbackError::Io(io::Error::other(e)))?
    }

    async fn mutate<R, F>(&self, f: F) -> Result<R, FallbackError>
    where
        R: Send + 'static,
        F: FnOnce(&mut LocalSnapshot) -> R + Send + 'static,
    {
        self.locked(move |path| {
            let mut snapshot = load(path)?;
            let result = f(&mut snapshot);
            persist(path, &snapshot)?;
            Ok(result)
        })
        .await
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn load(path: &Path) -> Result<LocalSnapshot, FallbackError> {
    match std::fs::read(path) {
        Ok(bytes) if bytes.is_empty() => Ok(LocalSnapshot::default()),
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(LocalSnapshot::default()),
        Err(e) => Err(e.into()),
    }
}

/// Writes a uniquely named temp file next to the document and renames it into place,
/// so a crash mid-write leaves the previous contents intact.
fn persist(path: &Path, snapshot: &LocalSnapshot) -> Result<(), FallbackError> {
    let mut tmp = NamedTempFile::new_in(parent_dir(path))?;
    serde_json::to_writer_pretty(&mut tmp, snapshot)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[async_trait::async_trait]
impl FallbackStore for JsonFileFallbackStore {
    async fn append_application(&self, application: &Application) -> Result<(), FallbackError> {
        let application = application.clone();
        self.mutate(move |snapshot| snapshot.applications.push(application)).await
    }

    async fn applications(&self) -> Result<Vec<Application>, FallbackError> {
        Ok(self.snapshot().await?.applications)
    }

    async fn increment_page_view(&self, date: NaiveDate) -> Result<u64, FallbackError> {
        self.mutate(move |snapshot| snapshot.bump_page_view(date)).await
    }

    async fn increment_social_click(
        &self,
        date: NaiveDate,
        platform: &str,
    ) -> Result<u64, FallbackError> {
        let platform = platform.to_string();
        self.mutate(move |snapshot| snapshot.bump_social_click(date, &platform)).await
    }

    async fn snapshot(&self) -> Result<LocalSnapshot, FallbackError> {
        self.locked(load).await
    }
}

/// Non-durable variant for tests and short-lived tools.
#[derive(Default)]
pub struct MemoryFallbackStore {
    inner: Mutex<LocalSnapshot>,
}

impl MemoryFallbackStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl FallbackStore for MemoryFallbackStore {
    async fn append_application(&self, application: &Application) -> Result<(), FallbackError> {
        self.inner.lock().await.applications.push(application.clone());
        Ok(())
    }

    async fn applications(&self) -> Result<Vec<Application>, FallbackError> {
        Ok(self.inner.lock().await.applications.clone())
    }

    async fn increment_page_view(&self, date: NaiveDate) -> Result<u64, FallbackError> {
        Ok(self.inner.lock().await.bump_page_view(date))
    }

    async fn increment_social_click(
        &self,
        date: NaiveDate,
        platform: &str,
    ) -> Result<u64, FallbackError> {
        Ok(self.inner.lock().await.bump_social_click(date, platform))
    }

    async fn snapshot(&self) -> Result<LocalSnapshot, FallbackError> {
        Ok(self.inner.lock().await.clone())
    }
}
