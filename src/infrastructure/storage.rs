use std::fs;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;

use crate::errors::StellwerkError;

/// Serialize `value` as pretty JSON and replace `path` atomically (temp file in
/// the same directory, then rename).
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), StellwerkError> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)
        .map_err(|e| StellwerkError::io("create_data_dir", parent.display(), e))?;

    let body = serde_json::to_vec_pretty(value)?;
    let mut temp = NamedTempFile::new_in(parent)
        .map_err(|e| StellwerkError::io("create_temp_file", parent.display(), e))?;
    temp.write_all(&body)
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|e| StellwerkError::io("write_temp_file", temp.path().display(), e))?;
    temp.persist(path)
        .map_err(|e| StellwerkError::io("persist", path.display(), e.error))?;
    Ok(())
}

/// Read and decode a JSON file. A missing file is `Ok(None)`; unreadable or
/// malformed content is an error the caller decides how to degrade.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StellwerkError> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path).map_err(|e| StellwerkError::io("read", path.display(), e))?;
    let parsed = serde_json::from_str(&raw)?;
    Ok(Some(parsed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Sample {
        name: String,
    }

    #[test]
    fn writes_then_reads_back_creating_parents() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("sample.json");
        write_json_atomic(&path, &Sample { name: "a".into() }).unwrap();

        let loaded: Option<Sample> = read_json(&path).unwrap();
        assert_eq!(loaded, Some(Sample { name: "a".into() }));
    }

    #[test]
    fn missing_file_is_none() {
        let temp = TempDir::new().unwrap();
        let loaded: Option<Sample> = read_json(&temp.path().join("absent.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn malformed_file_is_serialization_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        let err = read_json::<Sample>(&path).unwrap_err();
        assert!(matches!(err, StellwerkError::SerializationError { .. }));
    }

    #[test]
    fn overwrite_leaves_no_temp_files_behind() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("sample.json");
        write_json_atomic(&path, &Sample { name: "one".into() }).unwrap();
        write_json_atomic(&path, &Sample { name: "two".into() }).unwrap();

        let entries: Vec<_> = fs::read_dir(temp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
        let loaded: Option<Sample> = read_json(&path).unwrap();
        assert_eq!(loaded.unwrap().name, "two");
    }
}
