//! Utility functions for file resolution and process output handling

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Find the most recently created regular file in a directory
///
/// Creation time is used when the filesystem reports it, otherwise the
/// modification time. Subdirectories and unreadable entries are skipped.
///
/// # Returns
///
/// `Ok(None)` when the directory contains no regular files.
pub fn most_recent_file(dir: &Path) -> Result<Option<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| Error::Filesystem {
        message: format!("failed to scan '{}': {e}", dir.display()),
        path: Some(dir.to_path_buf()),
    })?;

    let mut newest: Option<(SystemTime, PathBuf)> = None;
    for entry in entries.flatten() {
        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        if !metadata.is_file() {
            continue;
        }

        // Not all filesystems expose a creation time
        let stamp = metadata
            .created()
            .or_else(|_| metadata.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);

        match &newest {
            Some((best, _)) if *best >= stamp => {}
            _ => newest = Some((stamp, entry.path())),
        }
    }

    Ok(newest.map(|(_, path)| path))
}

/// Summarize a process's stderr into a single-line failure reason
///
/// Takes the last non-empty line, which is where the external tool puts its
/// actual error, and strips the tool's `ERROR:` prefix when present.
pub fn stderr_summary(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let line = text
        .lines()
        .rev()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("no error output");

    line.strip_prefix("ERROR:").map(str::trim).unwrap_or(line).to_string()
}

/// Guess a Content-Type from a media file extension
///
/// Unknown extensions fall back to `application/octet-stream` so the file is
/// always deliverable as an attachment.
pub fn content_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("mp4" | "m4v") => "video/mp4",
        Some("webm") => "video/webm",
        Some("mkv") => "video/x-matroska",
        Some("mov") => "video/quicktime",
        Some("avi") => "video/x-msvideo",
        Some("flv") => "video/x-flv",
        Some("m4a") => "audio/mp4",
        Some("mp3") => "audio/mpeg",
        Some("opus" | "ogg") => "audio/ogg",
        Some("wav") => "audio/wav",
        _ => "application/octet-stream",
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn most_recent_file_picks_newest() {
        let dir = tempfile::tempdir().unwrap();

        let older = dir.path().join("older.mp4");
        fs::write(&older, b"a").unwrap();
        // Creation-time resolution is a full second on some filesystems
        std::thread::sleep(std::time::Duration::from_millis(1100));
        let newer = dir.path().join("newer.mp4");
        fs::write(&newer, b"b").unwrap();

        let found = most_recent_file(dir.path()).unwrap();
        assert_eq!(found, Some(newer));
    }

    #[test]
    fn most_recent_file_ignores_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("partial")).unwrap();

        assert_eq!(most_recent_file(dir.path()).unwrap(), None);

        let file = dir.path().join("video.webm");
        fs::write(&file, b"x").unwrap();
        assert_eq!(most_recent_file(dir.path()).unwrap(), Some(file));
    }

    #[test]
    fn most_recent_file_empty_dir_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(most_recent_file(dir.path()).unwrap(), None);
    }

    #[test]
    fn most_recent_file_missing_dir_is_filesystem_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone");

        let err = most_recent_file(&missing).unwrap_err();
        assert!(matches!(err, Error::Filesystem { .. }));
    }

    #[test]
    fn stderr_summary_takes_last_meaningful_line() {
        let stderr = b"WARNING: something minor\n\nERROR: Video unavailable\n\n";
        assert_eq!(stderr_summary(stderr), "Video unavailable");
    }

    #[test]
    fn stderr_summary_without_error_prefix_is_verbatim() {
        let stderr = b"connection reset by peer\n";
        assert_eq!(stderr_summary(stderr), "connection reset by peer");
    }

    #[test]
    fn stderr_summary_of_empty_output_is_placeholder() {
        assert_eq!(stderr_summary(b""), "no error output");
        assert_eq!(stderr_summary(b"\n  \n"), "no error output");
    }

    #[test]
    fn content_type_covers_common_containers() {
        assert_eq!(content_type_for(Path::new("a.mp4")), "video/mp4");
        assert_eq!(content_type_for(Path::new("a.WEBM")), "video/webm");
        assert_eq!(content_type_for(Path::new("a.mkv")), "video/x-matroska");
        assert_eq!(content_type_for(Path::new("a.m4a")), "audio/mp4");
        assert_eq!(
            content_type_for(Path::new("a.bin")),
            "application/octet-stream"
        );
        assert_eq!(
            content_type_for(Path::new("no-extension")),
            "application/octet-stream"
        );
    }
}
