//! Directory and file creation under a project root

use super::ScaffoldError;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Create each relative directory under `root`, parents included
///
/// Directories that already exist are left alone.
pub async fn create_dirs<D: AsRef<str>>(
    root: &Path,
    dirs: &[D],
) -> Result<Vec<PathBuf>, ScaffoldError> {
    let mut created = Vec::with_capacity(dirs.len());

    for dir in dirs {
        let path = root.join(dir.as_ref());
        fs::create_dir_all(&path)
            .await
            .map_err(|source| ScaffoldError::CreateDir {
                path: path.clone(),
                source,
            })?;
        created.push(path);
    }

    Ok(created)
}

/// Create each relative file under `root` as an empty file
///
/// Missing parent directories are created. Existing files keep their content.
pub async fn create_files<F: AsRef<str>>(
    root: &Path,
    files: &[F],
) -> Result<Vec<PathBuf>, ScaffoldError> {
    let mut created = Vec::with_capacity(files.len());

    for file in files {
        let path = root.join(file.as_ref());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| ScaffoldError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|source| ScaffoldError::CreateFile {
                path: path.clone(),
                source,
            })?;
        created.push(path);
    }

    Ok(created)
}

/// Write `content` to `root/relative`, replacing any existing file
pub async fn write_file(
    root: &Path,
    relative: &str,
    content: &str,
) -> Result<PathBuf, ScaffoldError> {
    let path = root.join(relative);
    fs::write(&path, content)
        .await
        .map_err(|source| ScaffoldError::CreateFile {
            path: path.clone(),
            source,
        })?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_dirs_nested() {
        let dir = tempfile::tempdir().unwrap();

        let created = create_dirs(dir.path(), &["static", "static/css", "app/routers"])
            .await
            .unwrap();

        assert_eq!(created.len(), 3);
        assert!(dir.path().join("static/css").is_dir());
        assert!(dir.path().join("app/routers").is_dir());
    }

    #[tokio::test]
    async fn test_create_dirs_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();

        create_dirs(dir.path(), &["tests"]).await.unwrap();
        create_dirs(dir.path(), &["tests"]).await.unwrap();

        assert!(dir.path().join("tests").is_dir());
    }

    #[tokio::test]
    async fn test_create_files_keeps_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("main.py"), "print('hi')\n").unwrap();

        create_files(dir.path(), &["main.py", "app/__init__.py"])
            .await
            .unwrap();

        assert_eq!(
            std::fs::read_to_string(dir.path().join("main.py")).unwrap(),
            "print('hi')\n"
        );
        assert!(dir.path().join("app/__init__.py").is_file());
        assert_eq!(
            std::fs::metadata(dir.path().join("app/__init__.py"))
                .unwrap()
                .len(),
            0
        );
    }

    #[tokio::test]
    async fn test_create_dirs_reports_path_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("static"), "").unwrap();

        let err = create_dirs(dir.path(), &["static/css"]).await.unwrap_err();

        assert!(err.to_string().contains("static"));
    }

    #[tokio::test]
    async fn test_write_file_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("main.py"), "old").unwrap();

        let path = write_file(dir.path(), "main.py", "new").await.unwrap();

        assert_eq!(std::fs::read_to_string(path).unwrap(), "new");
    }
}
