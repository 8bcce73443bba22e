//! Workspace inbox for photo attachments.
//!
//! Incoming photos are written here so the assistant process can read them
//! from disk; the prompt names the saved paths. Files live only for the
//! duration of one request.

use courier_core::config::shellexpand;
use courier_core::message::{Attachment, AttachmentType};
use std::path::PathBuf;

/// Ensure the workspace inbox directory exists and return its path.
pub(super) fn ensure_inbox_dir(workspace_dir: &str) -> PathBuf {
    let dir = PathBuf::from(shellexpand(workspace_dir)).join("inbox");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

/// Save image attachments to the inbox directory and return the paths.
pub(super) fn save_attachments(inbox: &std::path::Path, attachments: &[Attachment]) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for attachment in attachments {
        if !matches!(attachment.file_type, AttachmentType::Image) {
            continue;
        }
        if let Some(ref data) = attachment.data {
            let filename = attachment.filename.as_deref().unwrap_or("image.jpg");
            let path = inbox.join(filename);
            if std::fs::write(&path, data).is_ok() {
                paths.push(path);
            }
        }
    }
    paths
}

/// RAII guard that deletes inbox files when dropped.
///
/// Guarantees cleanup regardless of early returns in the photo handler.
pub(super) struct InboxGuard {
    paths: Vec<PathBuf>,
}

impl InboxGuard {
    pub(super) fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }
}

impl Drop for InboxGuard {
    fn drop(&mut self) {
        for path in &self.paths {
            let _ = std::fs::remove_file(path);
        }
    }
}

/// Purge all files in the inbox directory (startup cleanup after a crash).
pub(super) fn purge_inbox(workspace_dir: &str) {
    let inbox = ensure_inbox_dir(workspace_dir);
    if let Ok(entries) = std::fs::read_dir(&inbox) {
        let mut count = 0u32;
        for entry in entries.flatten() {
            if entry.path().is_file() {
                let _ = std::fs::remove_file(entry.path());
                count += 1;
            }
        }
        if count > 0 {
            tracing::info!("startup: purged {count} orphaned inbox file(s)");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_inbox_dir_creates_it() {
        let tmp = tempfile::tempdir().unwrap();
        let workspace = tmp.path().to_str().unwrap();
        let inbox = ensure_inbox_dir(workspace);
        assert!(inbox.is_dir());
        assert!(inbox.ends_with("inbox"));
    }

    #[test]
    fn test_save_and_guard_cleanup() {
        let tmp = tempfile::tempdir().unwrap();
        let attachments = vec![Attachment {
            file_type: AttachmentType::Image,
            data: Some(vec![0xFF, 0xD8, 0xFF]),
            filename: Some("photo.jpg".to_string()),
        }];

        let paths = save_attachments(tmp.path(), &attachments);
        assert_eq!(paths.len(), 1);
        assert!(paths[0].exists());

        drop(InboxGuard::new(paths.clone()));
        assert!(!paths[0].exists());
    }

    #[test]
    fn test_save_skips_non_images_and_missing_data() {
        let tmp = tempfile::tempdir().unwrap();
        let attachments = vec![
            Attachment {
                file_type: AttachmentType::Other,
                data: Some(vec![1, 2, 3]),
                filename: Some("doc.pdf".to_string()),
            },
            Attachment {
                file_type: AttachmentType::Image,
                data: None,
                filename: Some("empty.jpg".to_string()),
            },
        ];
        assert!(save_attachments(tmp.path(), &attachments).is_empty());
    }

    #[test]
    fn test_purge_inbox_removes_stale_files() {
        let tmp = tempfile::tempdir().unwrap();
        let workspace = tmp.path().to_str().unwrap();
        let inbox = ensure_inbox_dir(workspace);
        std::fs::write(inbox.join("stale.jpg"), b"x").unwrap();

        purge_inbox(workspace);
        assert_eq!(std::fs::read_dir(&inbox).unwrap().count(), 0);
    }
}
