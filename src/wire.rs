//! JSON request/response shapes at the transport boundary.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use rootscan_scan::{AggregateResult, FileRecord, FolderEntry, ScanStats};

/// Errors decoding a request.
#[derive(Debug, Error)]
pub enum WireError {
    /// The request was not valid JSON or lacked required fields.
    #[error("Malformed request: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The request named an action this server does not handle.
    #[error("Unknown action: {0}")]
    UnknownAction(String),
}

/// Envelope of every incoming message.
#[derive(Debug, Deserialize)]
struct Envelope {
    action: String,
    #[serde(default)]
    data: serde_json::Value,
}

/// Payload of a `scan` action.
#[derive(Debug, Deserialize)]
struct ScanFolders {
    #[serde(rename = "Folders", alias = "folders")]
    folders: Vec<String>,
}

/// A decoded request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Scan the given roots.
    Scan(Vec<PathBuf>),
}

/// Decode one JSON request.
pub fn decode(input: &str) -> Result<Request, WireError> {
    let envelope: Envelope = serde_json::from_str(input)?;
    match envelope.action.as_str() {
        "scan" => {
            let payload: ScanFolders = serde_json::from_value(envelope.data)?;
            Ok(Request::Scan(
                payload.folders.into_iter().map(PathBuf::from).collect(),
            ))
        }
        other => Err(WireError::UnknownAction(other.to_string())),
    }
}

/// Aggregate counts as sent to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireStats {
    /// Number of files recorded.
    pub file_count: u64,
    /// Sum of file sizes in bytes.
    pub total_size: u64,
    /// Directories below the roots.
    pub dir_count: u64,
    /// Root-level plus entry-level errors.
    pub error_count: u64,
}

impl From<&ScanStats> for WireStats {
    fn from(stats: &ScanStats) -> Self {
        Self {
            file_count: stats.file_count,
            total_size: stats.total_size,
            dir_count: stats.dir_count,
            error_count: stats.error_count,
        }
    }
}

/// One file record as sent to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireFile {
    /// Path relative to its root.
    pub path: String,
    /// Size in bytes.
    pub size: u64,
    /// Unix seconds, as a string.
    pub modified_at: String,
    /// Root the file was found under.
    pub root: String,
}

impl From<&FileRecord> for WireFile {
    fn from(file: &FileRecord) -> Self {
        Self {
            path: file.path.to_string(),
            size: file.size,
            modified_at: file.modified_at.timestamp().to_string(),
            root: file.root.to_string_lossy().to_string(),
        }
    }
}

/// Per-root summary as sent to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireFolder {
    /// Root path as requested.
    pub path: String,
    /// Total bytes under the root.
    pub size: u64,
    /// Unix seconds, as a string.
    pub modified_at: String,
}

impl From<&FolderEntry> for WireFolder {
    fn from(folder: &FolderEntry) -> Self {
        Self {
            path: folder.path.to_string_lossy().to_string(),
            size: folder.size,
            modified_at: folder.modified_at.timestamp().to_string(),
        }
    }
}

/// Successful response to a `scan` request.
#[derive(Debug, Serialize)]
pub struct ScanResponse {
    /// Aggregate counts.
    pub stats: WireStats,
    /// Human-readable total size.
    pub hsize: String,
    /// Every file from every root.
    pub files: Vec<WireFile>,
    /// One entry per successfully scanned root.
    pub folders: Vec<WireFolder>,
    /// Rendered root-level and entry-level errors.
    pub errors: Vec<String>,
}

impl From<&AggregateResult> for ScanResponse {
    fn from(result: &AggregateResult) -> Self {
        Self {
            stats: WireStats::from(&result.stats),
            hsize: humansize::format_size(result.stats.total_size, humansize::BINARY),
            files: result.files.iter().map(WireFile::from).collect(),
            folders: result.folders.iter().map(WireFolder::from).collect(),
            errors: result.errors.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Response to a request that could not be handled.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Why the request failed.
    pub error: String,
}

impl ErrorResponse {
    /// Build a response from a decode failure.
    pub fn new(error: &WireError) -> Self {
        Self {
            error: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rootscan_scan::{PartialResult, ScanError, ScanIssue};
    use std::time::{Duration, SystemTime};

    #[test]
    fn test_decode_scan_request() {
        let request = decode(r#"{"action":"scan","data":{"Folders":["/data/a","/data/b"]}}"#).unwrap();
        assert_eq!(
            request,
            Request::Scan(vec![PathBuf::from("/data/a"), PathBuf::from("/data/b")])
        );
    }

    #[test]
    fn test_decode_accepts_lowercase_folders() {
        let request = decode(r#"{"action":"scan","data":{"folders":[]}}"#).unwrap();
        assert_eq!(request, Request::Scan(Vec::new()));
    }

    #[test]
    fn test_decode_rejects_bad_input() {
        assert!(matches!(decode("not json"), Err(WireError::Malformed(_))));
        assert!(matches!(
            decode(r#"{"action":"scan"}"#),
            Err(WireError::Malformed(_))
        ));
        assert!(matches!(
            decode(r#"{"action":"delete","data":{}}"#),
            Err(WireError::UnknownAction(a)) if a == "delete"
        ));
    }

    #[test]
    fn test_response_shape() {
        let modified = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let mut partial = PartialResult::new("/data/b");
        partial.record_file(FileRecord::new("b", 50, modified, "/data/b"));
        partial.record_issue(ScanIssue::entry("/data/b/x", "Permission denied"));
        let mut result = AggregateResult::from(partial.finish(modified));
        result.absorb(PartialResult::root_failure(
            "/data/missing",
            &ScanError::NotFound {
                path: PathBuf::from("/data/missing"),
            },
        ));

        let json = serde_json::to_value(ScanResponse::from(&result)).unwrap();

        assert_eq!(json["stats"]["fileCount"], 1);
        assert_eq!(json["stats"]["totalSize"], 50);
        assert_eq!(json["stats"]["dirCount"], 0);
        assert_eq!(json["stats"]["errorCount"], 2);
        assert_eq!(json["hsize"], "50 B");
        assert_eq!(json["files"][0]["modifiedAt"], "1700000000");
        assert_eq!(json["files"][0]["root"], "/data/b");
        assert_eq!(json["folders"][0]["path"], "/data/b");
        assert_eq!(json["folders"][0]["size"], 50);
        assert_eq!(json["errors"].as_array().map(Vec::len), Some(2));
        assert_eq!(
            json["errors"][1],
            "cannot scan /data/missing: Path not found: /data/missing"
        );
    }

    #[test]
    fn test_error_response() {
        let err = WireError::UnknownAction("list".to_string());
        let json = serde_json::to_string(&ErrorResponse::new(&err)).unwrap();
        assert_eq!(json, r#"{"error":"Unknown action: list"}"#);
    }
}
