use std::{borrow::Cow, io, path::PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use futures_util::future::join_all;
use tracing::{debug, warn};

use crate::constants::MAX_FILE_SIZE;
use crate::modules::application::model::{FileCategory, FileDescriptor, FileMap};

#[derive(thiserror::Error, Debug)]
pub enum FileError {
    #[error("File \"{0}\" is larger than 5MB, please choose a smaller file")]
    TooLarge(String),
    #[error("Failed to read \"{name}\": {source}")]
    ReadFailure {
        name: String,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone)]
enum FileSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// A file the applicant picked for one of the upload inputs. Nothing is read until
/// [`FileEncoder::encode`] runs.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub size: u64,
    pub mime_type: String,
    source: FileSource,
}

impl SelectedFile {
    pub async fn from_path(path: impl Into<PathBuf>) -> Result<Self, FileError> {
        let path = path.into();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|source| FileError::ReadFailure { name: name.clone(), source })?;

        Ok(Self {
            mime_type: mime_guess::from_path(&path).first_or_octet_stream().to_string(),
            name,
            size: metadata.len(),
            source: FileSource::Path(path),
        })
    }

    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>, mime_type: Option<&str>) -> Self {
        let name = name.into();
        let mime_type = match mime_type {
            Some(mime) => mime.to_string(),
            None => mime_guess::from_path(&name).first_or_octet_stream().to_string(),
        };
        Self { size: bytes.len() as u64, mime_type, name, source: FileSource::Bytes(bytes) }
    }

    async fn read(&self) -> Result<Cow<'_, [u8]>, FileError> {
        match &self.source {
            FileSource::Bytes(bytes) => Ok(Cow::Borrowed(bytes)),
            FileSource::Path(path) => tokio::fs::read(path)
                .await
                .map(Cow::Owned)
                .map_err(|source| FileError::ReadFailure { name: self.name.clone(), source }),
        }
    }
}

/// Holds the current selection for each of the four upload inputs and turns them into
/// base64 [`FileDescriptor`]s in one pass.
#[derive(Debug, Clone)]
pub struct FileEncoder {
    max_file_size: u64,
    selections: [Vec<SelectedFile>; 4],
}

impl Default for FileEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FileEncoder {
    pub fn new() -> Self {
        Self { max_file_size: MAX_FILE_SIZE, selections: Default::default() }
    }

    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    pub fn selected(&self, category: FileCategory) -> &[SelectedFile] {
        &self.selections[category.index()]
    }

    /// Replaces the selection for `category`. If any file is over the limit the whole
    /// input is cleared and nothing from it is kept.
    pub fn select(
        &mut self,
        category: FileCategory,
        files: Vec<SelectedFile>,
    ) -> Result<(), FileError> {
        if let Some(file) = files.iter().find(|file| file.size > self.max_file_size) {
            self.selections[category.index()].clear();
            warn!("Rejected {} selection: {} is {} bytes", category, file.name, file.size);
            return Err(FileError::TooLarge(file.name.clone()));
        }
        self.selections[category.index()] = files;
        Ok(())
    }

    pub fn clear(&mut self, category: FileCategory) {
        self.selections[category.index()].clear();
    }

    /// Reads every selected file across all inputs concurrently and resolves once all of
    /// them have finished. Any oversized or unreadable file fails the whole batch; an
    /// oversized file also clears its input. Empty files are skipped.
    pub async fn encode(&mut self) -> Result<FileMap, FileError> {
        for category in FileCategory::ALL {
            let selection = &self.selections[category.index()];
            if let Some(file) = selection.iter().find(|file| file.size > self.max_file_size) {
                let name = file.name.clone();
                self.clear(category);
                return Err(FileError::TooLarge(name));
            }
        }

        let max_file_size = self.max_file_size;
        let selections = &self.selections;
        let reads = FileCategory::ALL.into_iter().flat_map(|category| {
            selections[category.index()]
                .iter()
                .filter(|file| {
                    if file.size == 0 {
                        debug!("Skipping empty file {}", file.name);
                    }
                    file.size > 0
                })
                .map(move |file| encode_one(category, file, max_file_size))
        });
        let results = join_all(reads).await;
        debug!("Encoded {} file(s)", results.len());

        let mut files = FileMap::default();
        for result in results {
            match result {
                Ok((category, descriptor)) => files.get_mut(category).push(descriptor),
                Err((category, err)) => {
                    if matches!(err, FileError::TooLarge(_)) {
                        self.clear(category);
                    }
                    return Err(err);
                }
            }
        }
        Ok(files)
    }
}

async fn encode_one(
    category: FileCategory,
    file: &SelectedFile,
    max_file_size: u64,
) -> Result<(FileCategory, FileDescriptor), (FileCategory, FileError)> {
    let bytes = file.read().await.map_err(|err| (category, err))?;
    // the file may have grown since it was selected
    if bytes.len() as u64 > max_file_size {
        return Err((category, FileError::TooLarge(file.name.clone())));
    }

    Ok((
        category,
        FileDescriptor {
            name: file.name.clone(),
            size: bytes.len() as u64,
            mime_type: file.mime_type.clone(),
            data: STANDARD.encode(&bytes),
            upload_date: Utc::now(),
        },
    ))
}
