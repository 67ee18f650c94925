//! Request and response bodies exchanged over the API.

use filestore_core::StoredFile;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One entry of a file listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FileEntry {
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Last modification time, RFC 3339 / ISO-8601
    pub modified: String,
    pub mime_type: String,
}

impl From<StoredFile> for FileEntry {
    fn from(file: StoredFile) -> Self {
        Self {
            name: file.name,
            size: file.size,
            modified: file.modified.to_rfc3339(),
            mime_type: file.mime_type,
        }
    }
}

/// Files under the storage root, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ListFilesRes {
    pub files: Vec<FileEntry>,
}

/// Body of `POST /files/`.
///
/// Both fields are optional on the wire so that a missing filename can be reported as such
/// rather than as a deserialisation failure. `content` defaults to the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreateFileReq {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreateFileRes {
    pub message: String,
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReadFileRes {
    pub filename: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeleteFileRes {
    pub message: String,
}

/// Body returned with every non-2xx status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StorageStatus {
    Accessible,
    DirectoryNotFound,
}

/// Health check report.
///
/// `storage_status` is only present when healthy and `error` only when unhealthy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub status: HealthState,
    pub timestamp: String,
    pub storage_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_status: Option<StorageStatus>,
    pub pod_name: String,
    pub node_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthRes {
    pub fn is_healthy(&self) -> bool {
        self.status == HealthState::Healthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn file_entry_from_stored_file() {
        let stored = StoredFile {
            name: "notes.txt".into(),
            size: 5,
            modified: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
            mime_type: "text/plain".into(),
        };

        let entry = FileEntry::from(stored);

        assert_eq!(entry.name, "notes.txt");
        assert_eq!(entry.size, 5);
        assert_eq!(entry.modified, "2024-01-02T03:04:05+00:00");
        assert_eq!(entry.mime_type, "text/plain");
    }

    #[test]
    fn create_request_fields_are_optional() {
        let req: CreateFileReq = serde_json::from_str("{}").unwrap();
        assert_eq!(req, CreateFileReq::default());

        let req: CreateFileReq =
            serde_json::from_str(r#"{"filename": "a.txt", "content": null}"#).unwrap();
        assert_eq!(req.filename.as_deref(), Some("a.txt"));
        assert_eq!(req.content, None);
    }

    #[test]
    fn health_optional_fields_are_omitted() {
        let healthy = HealthRes {
            status: HealthState::Healthy,
            timestamp: "t".into(),
            storage_path: "/data".into(),
            storage_status: Some(StorageStatus::DirectoryNotFound),
            pod_name: "unknown".into(),
            node_name: "unknown".into(),
            error: None,
        };
        let json = serde_json::to_value(&healthy).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["storage_status"], "directory_not_found");
        assert!(json.get("error").is_none());

        let unhealthy = HealthRes {
            status: HealthState::Unhealthy,
            storage_status: None,
            error: Some("boom".into()),
            ..healthy
        };
        let json = serde_json::to_value(&unhealthy).unwrap();
        assert_eq!(json["status"], "unhealthy");
        assert_eq!(json["error"], "boom");
        assert!(json.get("storage_status").is_none());
    }
}
