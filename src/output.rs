use crate::error::{ReportError, Result};
use std::path::{Path, PathBuf};

/// File name used when the destination names a directory.
pub const DEFAULT_FILE_NAME: &str = "dalek.xml";

/// Final report path: `dest` itself if it has an `.xml` extension, otherwise
/// `dest/dalek.xml`.
pub fn resolve_destination(dest: &Path) -> PathBuf {
    if dest.extension().is_some_and(|ext| ext == "xml") {
        dest.to_path_buf()
    } else {
        dest.join(DEFAULT_FILE_NAME)
    }
}

/// Write `contents` to `path`, creating parent directories and overwriting any
/// existing file.
pub fn write_report(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| ReportError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, contents).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_resolve_destination() {
        assert_eq!(
            resolve_destination(Path::new("report")),
            PathBuf::from("report/dalek.xml")
        );
        assert_eq!(
            resolve_destination(Path::new("out/results.xml")),
            PathBuf::from("out/results.xml")
        );
        assert_eq!(
            resolve_destination(Path::new("out/results.json")),
            PathBuf::from("out/results.json/dalek.xml")
        );
    }

    #[test]
    fn test_write_creates_nested_dirs_and_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a/b/c/report.xml");

        write_report(&path, "first").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first");

        write_report(&path, "second").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn test_write_fails_when_parent_is_a_file() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let err = write_report(&blocker.join("dalek.xml"), "x").unwrap_err();
        assert!(matches!(err, ReportError::CreateDir { .. }));
    }
}
