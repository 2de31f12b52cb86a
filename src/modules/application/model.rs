use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// The four fixed upload inputs, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FileCategory {
    Passport,
    Cv,
    Certificates,
    OtherDocuments,
}

impl FileCategory {
    pub const ALL: [FileCategory; 4] =
        [FileCategory::Passport, FileCategory::Cv, FileCategory::Certificates, FileCategory::OtherDocuments];

    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Passport => "passport",
            FileCategory::Cv => "cv",
            FileCategory::Certificates => "certificates",
            FileCategory::OtherDocuments => "otherDocuments",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            FileCategory::Passport => 0,
            FileCategory::Cv => 1,
            FileCategory::Certificates => 2,
            FileCategory::OtherDocuments => 3,
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One uploaded document, embedded in its application as base64.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptor {
    pub name: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub data: String,
    pub upload_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileMap {
    pub passport: Vec<FileDescriptor>,
    pub cv: Vec<FileDescriptor>,
    pub certificates: Vec<FileDescriptor>,
    pub other_documents: Vec<FileDescriptor>,
}

impl FileMap {
    pub fn get(&self, category: FileCategory) -> &[FileDescriptor] {
        match category {
            FileCategory::Passport => &self.passport,
            FileCategory::Cv => &self.cv,
            FileCategory::Certificates => &self.certificates,
            FileCategory::OtherDocuments => &self.other_documents,
        }
    }

    pub fn get_mut(&mut self, category: FileCategory) -> &mut Vec<FileDescriptor> {
        match category {
            FileCategory::Passport => &mut self.passport,
            FileCategory::Cv => &mut self.cv,
            FileCategory::Certificates => &mut self.certificates,
            FileCategory::OtherDocuments => &mut self.other_documents,
        }
    }

    pub fn total(&self) -> usize {
        FileCategory::ALL.iter().map(|category| self.get(*category).len()).sum()
    }

    /// Decodes the `files` field however it was stored: a structured object, a
    /// JSON-encoded string, or an empty PHP-style array. Anything unreadable becomes an
    /// empty mapping so one bad record never poisons a listing.
    pub fn from_json_value(value: &serde_json::Value) -> Self {
        Self::parse_value(value).unwrap_or_else(Self::discard)
    }

    /// Same as [`FileMap::from_json_value`] for a column holding encoded JSON text.
    pub fn from_encoded(encoded: &str) -> Self {
        Self::parse_encoded(encoded).unwrap_or_else(Self::discard)
    }

    fn discard() -> Self {
        log::warn!("Discarding malformed files payload");
        FileMap::default()
    }

    fn parse_value(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Null => Some(FileMap::default()),
            serde_json::Value::Array(items) if items.is_empty() => Some(FileMap::default()),
            serde_json::Value::String(encoded) => Self::parse_encoded(encoded),
            other => serde_json::from_value::<FileMap>(other.clone()).ok(),
        }
    }

    fn parse_encoded(encoded: &str) -> Option<Self> {
        if encoded.trim().is_empty() {
            return Some(FileMap::default());
        }
        match serde_json::from_str::<serde_json::Value>(encoded).ok()? {
            serde_json::Value::String(_) => None,
            other => Self::parse_value(&other),
        }
    }
}

fn lenient_files<'de, D>(de: D) -> Result<FileMap, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(de)?;
    Ok(FileMap::from_json_value(&value))
}

/// Review state. Unknown values survive a round trip untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Reviewed,
    Accepted,
    Rejected,
    Other(String),
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Reviewed => "reviewed",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Other(other) => other,
        }
    }
}

impl From<String> for ApplicationStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "pending" => ApplicationStatus::Pending,
            "reviewed" => ApplicationStatus::Reviewed,
            "accepted" => ApplicationStatus::Accepted,
            "rejected" => ApplicationStatus::Rejected,
            _ => ApplicationStatus::Other(value),
        }
    }
}

impl From<ApplicationStatus> for String {
    fn from(value: ApplicationStatus) -> Self {
        match value {
            ApplicationStatus::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for ApplicationStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ApplicationStatus::from(s.to_string()))
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One applicant's submission record as exchanged over the API and kept in the
/// local fallback store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient_files")]
    pub files: FileMap,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(default)]
    pub archived: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_delete_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /applications`. Older form builds send `timestamp` instead of
/// `createdAt`/`updatedAt`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplicationModel {
    #[validate(length(min = 1, message = "Application ID cannot be empty"))]
    pub id: String,
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Phone cannot be empty"))]
    pub phone: String,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient_files")]
    pub files: FileMap,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(alias = "timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdateStatusModel {
    #[validate(length(min = 1, message = "Missing required fields"))]
    pub id: String,
    #[validate(length(min = 1, message = "Missing required fields"))]
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ArchiveModel {
    #[validate(length(min = 1, message = "Missing application ID"))]
    pub id: String,
}

/// `?action=` selector on `POST /applications`. Absent means create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationAction {
    UpdateStatus,
    Archive,
}

impl ApplicationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationAction::UpdateStatus => "update_status",
            ApplicationAction::Archive => "archive",
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ActionQuery {
    pub action: Option<ApplicationAction>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ListQuery {
    #[serde(default)]
    pub archived: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct DeleteQuery {
    pub id: Option<String>,
}

/// Every mutation the applications endpoint accepts, decoded and validated at the
/// HTTP boundary.
#[derive(Debug)]
pub enum ApplicationRequest {
    CreateApplication(CreateApplicationModel),
    UpdateStatus(UpdateStatusModel),
    Archive(ArchiveModel),
    Delete { id: String },
}

/// Row written by the repository on create.
pub struct InsertApplication {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub experience: String,
    pub message: String,
    pub files: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveResponse {
    pub archived_at: DateTime<Utc>,
    pub auto_delete_date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn descriptor(name: &str) -> serde_json::Value {
        json!({
            "name": name,
            "size": 4,
            "type": "application/pdf",
            "data": "AAECAw==",
            "uploadDate": "2026-10-16T08:00:00Z"
        })
    }

    fn record(files: serde_json::Value) -> serde_json::Value {
        json!({
            "id": "0192f1c0a1b27c3d8e9f001122334455",
            "name": "Ana Vidic",
            "email": "ana@example.com",
            "phone": "+905551112233",
            "files": files,
            "status": "pending",
            "archived": false,
            "createdAt": "2026-10-16T08:00:00Z",
            "updatedAt": "2026-10-16T08:00:00Z"
        })
    }

    #[test]
    fn test_status_known_and_open_values() {
        let status: ApplicationStatus = serde_json::from_value(json!("accepted")).unwrap();
        assert_eq!(status, ApplicationStatus::Accepted);

        let status: ApplicationStatus = serde_json::from_value(json!("interview")).unwrap();
        assert_eq!(status, ApplicationStatus::Other("interview".to_string()));
        assert_eq!(serde_json::to_value(&status).unwrap(), json!("interview"));

        assert_eq!(ApplicationStatus::default().as_str(), "pending");
    }

    #[test]
    fn test_files_decoded_from_encoded_string() {
        let encoded = json!({ "passport": [descriptor("passport.jpg")] }).to_string();
        let app: Application = serde_json::from_value(record(json!(encoded))).unwrap();
        assert_eq!(app.files.passport.len(), 1);
        assert_eq!(app.files.passport[0].name, "passport.jpg");
        assert!(app.files.cv.is_empty());
    }

    #[test]
    fn test_malformed_files_become_empty_without_failing_list() {
        let list = json!([
            record(json!("{not json")),
            record(json!({ "cv": [descriptor("cv.pdf")] })),
            record(json!([])),
        ]);
        let apps: Vec<Application> = serde_json::from_value(list).unwrap();
        assert_eq!(apps.len(), 3);
        assert_eq!(apps[0].files, FileMap::default());
        assert_eq!(apps[1].files.cv.len(), 1);
        assert_eq!(apps[2].files, FileMap::default());
    }

    #[test]
    fn test_missing_files_default_to_empty() {
        let mut value = record(json!(null));
        value.as_object_mut().unwrap().remove("files");
        let app: Application = serde_json::from_value(value).unwrap();
        assert_eq!(app.files.total(), 0);
    }

    #[test]
    fn test_create_model_accepts_timestamp_alias() {
        let model: CreateApplicationModel = serde_json::from_value(json!({
            "id": "abc",
            "name": "Ana Vidic",
            "email": "ana@example.com",
            "phone": "+905551112233",
            "timestamp": "2026-10-16T08:00:00Z"
        }))
        .unwrap();
        assert_eq!(model.created_at.unwrap().to_rfc3339(), "2026-10-16T08:00:00+00:00");
        assert!(model.updated_at.is_none());
        assert_eq!(model.status, ApplicationStatus::Pending);
    }

    #[test]
    fn test_file_category_order_is_fixed() {
        let names: Vec<&str> = FileCategory::ALL.iter().map(|c| c.as_str()).collect();
        assert_eq!(names, ["passport", "cv", "certificates", "otherDocuments"]);
    }
}
