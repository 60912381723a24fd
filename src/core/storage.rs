//! # File Storage
//!
//! Disk I/O for the open and save commands, performed by the front end
//! when `update()` returns `Effect::ReadFiles`, `Effect::WriteFiles` or
//! `Effect::WritePreview`.
//!
//! All writes use atomic rename (write `.tmp`, then `rename()`) so a failed
//! save never leaves a half-written file behind.

use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use tokio::fs;

use crate::core::action::{Action, Effect};
use crate::core::controller::{ConsoleError, OpenedFile, SaveFile};

/// Carry out an I/O effect and return the action that reports its result.
/// Effects without I/O return `None`.
pub async fn perform(effect: Effect, save_dir: &Path) -> Option<Action> {
    match effect {
        Effect::None | Effect::Quit => None,
        Effect::ReadFiles(paths) => Some(Action::FilesRead(read_files(&paths).await)),
        Effect::WriteFiles(files) => {
            Some(Action::SaveFinished(write_files(save_dir, &files).await))
        }
        Effect::WritePreview { path, document } => {
            let result = write_preview(&path, &document).await.map(|()| path);
            Some(Action::PreviewWritten(result))
        }
    }
}

/// Read every selected file as UTF-8 text, in selection order.
///
/// The first failure aborts the whole open, so the surfaces are never
/// half-populated.
pub async fn read_files(paths: &[PathBuf]) -> Result<Vec<OpenedFile>, ConsoleError> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let text = fs::read_to_string(path).await.map_err(|e| {
            warn!("Failed to read {}: {}", path.display(), e);
            ConsoleError::ReadFailure {
                path: path.display().to_string(),
                reason: e.to_string(),
            }
        })?;
        debug!("Read {} ({} bytes)", path.display(), text.len());
        files.push(OpenedFile {
            name: path.to_string_lossy().into_owned(),
            text,
        });
    }
    Ok(files)
}

/// Write the files a save produced into `dir`, creating it if needed.
/// Returns the written paths in order.
pub async fn write_files(dir: &Path, files: &[SaveFile]) -> Result<Vec<PathBuf>, ConsoleError> {
    fs::create_dir_all(dir)
        .await
        .map_err(|e| write_failure(dir, e))?;

    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let path = dir.join(&file.name);
        atomic_write(&path, &file.text)
            .await
            .map_err(|e| write_failure(&path, e))?;
        info!("Saved {}", path.display());
        written.push(path);
    }
    Ok(written)
}

/// Export the synthesized preview document.
pub async fn write_preview(path: &Path, document: &str) -> Result<(), ConsoleError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| write_failure(parent, e))?;
    }
    atomic_write(path, document)
        .await
        .map_err(|e| write_failure(path, e))?;
    debug!("Preview exported to {}", path.display());
    Ok(())
}

async fn atomic_write(path: &Path, contents: &str) -> io::Result<()> {
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);
    fs::write(&tmp_path, contents).await?;
    fs::rename(&tmp_path, path).await
}

fn write_failure(path: &Path, e: io::Error) -> ConsoleError {
    warn!("Failed to write {}: {}", path.display(), e);
    ConsoleError::WriteFailure {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("polyglot-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[tokio::test]
    async fn test_write_then_read_files() {
        let dir = scratch_dir("storage-rw");
        let files = vec![
            SaveFile {
                name: "page.html".into(),
                text: "<p>hi</p>".into(),
            },
            SaveFile {
                name: "page.css".into(),
                text: "p {}".into(),
            },
        ];

        let written = write_files(&dir, &files).await.unwrap();
        assert_eq!(written, vec![dir.join("page.html"), dir.join("page.css")]);
        assert!(!dir.join("page.html.tmp").exists());

        let read = read_files(&written).await.unwrap();
        assert_eq!(read[0].text, "<p>hi</p>");
        assert_eq!(read[1].text, "p {}");
        assert!(read[1].name.ends_with("page.css"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_read_missing_file_is_read_failure() {
        let dir = scratch_dir("storage-missing");
        let result = read_files(&[dir.join("nope.js")]).await;
        match result {
            Err(ConsoleError::ReadFailure { path, reason }) => {
                assert!(path.ends_with("nope.js"));
                assert!(!reason.is_empty());
            }
            other => panic!("expected ReadFailure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_write_overwrites_existing_file() {
        let dir = scratch_dir("storage-overwrite");
        let save = |text: &str| {
            vec![SaveFile {
                name: "untitled.py".into(),
                text: text.into(),
            }]
        };
        write_files(&dir, &save("old")).await.unwrap();
        write_files(&dir, &save("new")).await.unwrap();
        let text = std::fs::read_to_string(dir.join("untitled.py")).unwrap();
        assert_eq!(text, "new");
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_perform_maps_effects_to_follow_up_actions() {
        let dir = scratch_dir("storage-perform");
        assert!(perform(Effect::None, &dir).await.is_none());
        assert!(perform(Effect::Quit, &dir).await.is_none());

        let save = Effect::WriteFiles(vec![SaveFile {
            name: "untitled.js".into(),
            text: "1".into(),
        }]);
        match perform(save, &dir).await {
            Some(Action::SaveFinished(Ok(paths))) => {
                assert_eq!(paths, vec![dir.join("untitled.js")]);
            }
            other => panic!("expected SaveFinished, got {other:?}"),
        }

        let read = Effect::ReadFiles(vec![dir.join("untitled.js")]);
        match perform(read, &dir).await {
            Some(Action::FilesRead(Ok(files))) => assert_eq!(files[0].text, "1"),
            other => panic!("expected FilesRead, got {other:?}"),
        }
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_write_preview_creates_parent() {
        let dir = scratch_dir("storage-preview");
        let path = dir.join("nested").join("preview.html");
        write_preview(&path, "<!DOCTYPE html>").await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<!DOCTYPE html>");
        let _ = std::fs::remove_dir_all(&dir);
    }
}
