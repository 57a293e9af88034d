//! Reading and writing option trees as JSON documents.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::StoreError;
use crate::OptionTree;

/// Reads the JSON object stored at `path`.
///
/// # Errors
///
/// [`StoreError::Io`] if the file cannot be read, [`StoreError::Parse`] if it
/// is not valid JSON, and [`StoreError::NotAnObject`] if the top-level value
/// is valid JSON but not an object.
pub fn read_document(path: &Path) -> Result<OptionTree, StoreError> {
    let content = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&content).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    match value {
        Value::Object(document) => Ok(document),
        _ => Err(StoreError::NotAnObject {
            path: path.to_path_buf(),
        }),
    }
}

/// Writes `document` to `path` as pretty-printed JSON.
///
/// The parent directory is created if needed.  The document is first written
/// to a sibling temporary file and then renamed over `path`, so a failed
/// write leaves the previous file intact.
///
/// # Errors
///
/// [`StoreError::Serialize`] if the document cannot be encoded, or
/// [`StoreError::Io`] for file-system failures.
pub fn write_document(path: &Path, document: &OptionTree) -> Result<(), StoreError> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|source| StoreError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let mut content = serde_json::to_string_pretty(document)?;
    content.push('\n');

    let temp_path = temp_path_for(path);
    fs::write(&temp_path, content).map_err(|source| StoreError::Io {
        path: temp_path.clone(),
        source,
    })?;
    fs::rename(&temp_path, path).map_err(|source| {
        // Best effort: do not leave the temporary file behind.
        let _ = fs::remove_file(&temp_path);
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    })
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("pan_json_test_{}", Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_write_then_read_document_round_trips() {
        // Arrange
        let dir = temp_dir();
        let path = dir.join("doc.json");
        let document = json!({"units": "metric", "providers": {"x": {"a": [1, 2]}}})
            .as_object()
            .cloned()
            .unwrap();

        // Act
        write_document(&path, &document).unwrap();
        let restored = read_document(&path).unwrap();

        // Assert
        assert_eq!(restored, document);
        assert!(!temp_path_for(&path).exists(), "temporary file must be renamed away");

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_write_document_creates_missing_parent_directories() {
        let dir = temp_dir();
        let path = dir.join("nested").join("deeper").join("doc.json");

        write_document(&path, &OptionTree::new()).unwrap();

        assert!(path.is_file());
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_write_document_preserves_key_order() {
        let dir = temp_dir();
        let path = dir.join("doc.json");
        let mut document = OptionTree::new();
        document.insert("zeta".to_string(), json!(1));
        document.insert("alpha".to_string(), json!(2));

        write_document(&path, &document).unwrap();
        let text = fs::read_to_string(&path).unwrap();

        assert!(text.find("zeta").unwrap() < text.find("alpha").unwrap());
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_read_document_rejects_malformed_json() {
        let dir = temp_dir();
        let path = dir.join("doc.json");
        fs::write(&path, "{ not json").unwrap();

        let err = read_document(&path).unwrap_err();

        assert!(matches!(err, StoreError::Parse { .. }));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_read_document_rejects_non_object_top_level() {
        let dir = temp_dir();
        let path = dir.join("doc.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let err = read_document(&path).unwrap_err();

        assert!(matches!(err, StoreError::NotAnObject { .. }));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_read_document_missing_file_is_io_error() {
        let err = read_document(Path::new("/nonexistent/path/that/cannot/exist.json")).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }

    #[test]
    fn test_temp_path_is_sibling_with_tmp_suffix() {
        assert_eq!(
            temp_path_for(Path::new("/a/b/pan-transit.json")),
            PathBuf::from("/a/b/pan-transit.json.tmp")
        );
    }
}
