// Writing scrape results to disk

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Serialize as JSON with four-space indentation and a trailing newline.
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    buffer.push(b'\n');
    Ok(buffer)
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}

fn discard(staging: &Path) {
    if let Err(e) = fs::remove_file(staging) {
        debug!("Could not remove {}: {}", staging.display(), e);
    }
}

/// Write `bytes` to the staging sibling of `path`, creating parent dirs.
fn stage(path: &Path, bytes: &[u8]) -> io::Result<PathBuf> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let staging = staging_path(path);
    if let Err(e) = fs::write(&staging, bytes) {
        discard(&staging);
        return Err(e);
    }
    Ok(staging)
}

/// Replace every destination with its document.
///
/// All documents are staged next to their destinations before any of them
/// is renamed into place, so a failed write leaves every existing file
/// untouched. Staged files are removed on failure.
pub fn write_documents(documents: &[(&Path, Vec<u8>)]) -> Result<(), (PathBuf, io::Error)> {
    let mut staged: Vec<(PathBuf, &Path)> = Vec::with_capacity(documents.len());
    for (path, bytes) in documents {
        match stage(path, bytes) {
            Ok(staging) => staged.push((staging, *path)),
            Err(e) => {
                for (staging, _) in &staged {
                    discard(staging);
                }
                return Err((path.to_path_buf(), e));
            }
        }
    }

    for (index, (staging, path)) in staged.iter().enumerate() {
        if let Err(e) = fs::rename(staging, path) {
            for (leftover, _) in &staged[index..] {
                discard(leftover);
            }
            return Err((path.to_path_buf(), e));
        }
        info!("Wrote {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_pretty_json_uses_four_spaces() {
        let bytes = to_pretty_json(&json!([{"Status": "Success"}])).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "[\n    {\n        \"Status\": \"Success\"\n    }\n]\n");
    }

    #[test]
    fn test_staging_path_is_a_sibling() {
        assert_eq!(
            staging_path(Path::new("out/response.json")),
            PathBuf::from("out/response.json.partial")
        );
    }

    #[test]
    fn test_write_replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("response.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "previous run").unwrap();

        let bytes = to_pretty_json(&json!({"Status": "Success"})).unwrap();
        write_documents(&[(path.as_path(), bytes)]).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "{\n    \"Status\": \"Success\"\n}\n");
        assert!(!staging_path(&path).exists());
    }

    #[test]
    fn test_failed_rename_removes_staged_file() {
        let dir = TempDir::new().unwrap();
        // A directory at the destination makes the rename fail
        let path = dir.path().join("response.json");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        assert!(write_documents(&[(path.as_path(), b"[]\n".to_vec())]).is_err());
        assert!(!staging_path(&path).exists());
        assert!(path.join("keep").exists());
    }

    #[test]
    fn test_failed_second_document_leaves_first_untouched() {
        let dir = TempDir::new().unwrap();
        let table = dir.path().join("response.json");
        fs::write(&table, "previous run").unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "a file, not a directory").unwrap();
        let metadata = blocker.join("metadata.json");

        let (failed, _) = write_documents(&[
            (table.as_path(), b"[]\n".to_vec()),
            (metadata.as_path(), b"{}\n".to_vec()),
        ])
        .unwrap_err();

        assert_eq!(failed, metadata);
        assert_eq!(fs::read_to_string(&table).unwrap(), "previous run");
        assert!(!staging_path(&table).exists());
    }
}
