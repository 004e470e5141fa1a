/// Local-disk file storage for attachments and avatars
///
/// Files live under a configurable upload root:
///
/// ```text
/// {root}/task_attachments/{task_id}/{filename}
/// {root}/profile_avatars/{user_id}/{filename}
/// ```
///
/// Database rows store the path relative to the root so the root can move
/// between environments. Filenames coming from clients are sanitized to a
/// plain basename and checked against an extension allowlist before any
/// byte reaches the disk.

use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

/// Extensions accepted for task attachments
pub const ALLOWED_ATTACHMENT_EXTENSIONS: &[&str] =
    &["pdf", "jpg", "jpeg", "png", "gif", "doc", "docx", "txt"];

/// Extensions accepted for profile avatars
pub const ALLOWED_AVATAR_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

/// Extensions treated as images for preview purposes
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Filename reduced to nothing after sanitization
    #[error("Invalid filename")]
    InvalidFilename,

    /// Extension not in the allowlist
    #[error("File type not allowed: {0}")]
    ExtensionNotAllowed(String),

    /// Underlying filesystem failure
    #[error("File storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reduces a client-supplied filename to a safe basename
///
/// Strips any directory components and replaces characters outside
/// `[A-Za-z0-9._-]` with underscores. Leading dots are dropped so the
/// result can never be a hidden file or a path traversal.
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();

    cleaned.trim_start_matches('.').to_string()
}

/// Lowercased extension with the dot, or empty when there is none
pub fn file_extension(filename: &str) -> String {
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
            format!(".{}", ext.to_lowercase())
        }
        _ => String::new(),
    }
}

/// Checks a filename against an extension allowlist
pub fn extension_allowed(filename: &str, allowed: &[&str]) -> bool {
    let ext = file_extension(filename);
    let ext = ext.trim_start_matches('.');
    !ext.is_empty() && allowed.contains(&ext)
}

/// Whether the filename looks like an image
pub fn is_image_filename(filename: &str) -> bool {
    extension_allowed(filename, IMAGE_EXTENSIONS)
}

/// Renders a byte count as `B` / `KB` / `MB`
pub fn format_file_size(size: i64) -> String {
    let size = size.max(0);
    if size < 1024 {
        format!("{} B", size)
    } else if size < 1024 * 1024 {
        format!("{:.1} KB", size as f64 / 1024.0)
    } else {
        format!("{:.1} MB", size as f64 / (1024.0 * 1024.0))
    }
}

/// Handle on the upload root directory
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `root`; the directory is created lazily
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The upload root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Relative storage path for a task attachment
    ///
    /// # Errors
    ///
    /// Rejects filenames that sanitize to nothing or carry a disallowed
    /// extension.
    pub fn attachment_path(&self, task_id: Uuid, filename: &str) -> Result<String, StorageError> {
        let safe = sanitize_filename(filename);
        if safe.is_empty() {
            return Err(StorageError::InvalidFilename);
        }
        if !extension_allowed(&safe, ALLOWED_ATTACHMENT_EXTENSIONS) {
            return Err(StorageError::ExtensionNotAllowed(file_extension(&safe)));
        }
        Ok(format!("task_attachments/{}/{}", task_id, safe))
    }

    /// Relative storage path for a profile avatar
    pub fn avatar_path(&self, user_id: Uuid, filename: &str) -> Result<String, StorageError> {
        let safe = sanitize_filename(filename);
        if safe.is_empty() {
            return Err(StorageError::InvalidFilename);
        }
        if !extension_allowed(&safe, ALLOWED_AVATAR_EXTENSIONS) {
            return Err(StorageError::ExtensionNotAllowed(file_extension(&safe)));
        }
        Ok(format!("profile_avatars/{}/{}", user_id, safe))
    }

    /// Absolute path of a stored file
    pub fn absolute(&self, relative_path: &str) -> PathBuf {
        self.root.join(relative_path)
    }

    /// Writes file bytes, creating parent directories as needed
    pub async fn save(&self, relative_path: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let path = self.absolute(relative_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, bytes).await?;
        Ok(())
    }

    /// Reads a stored file back
    pub async fn read(&self, relative_path: &str) -> Result<Vec<u8>, StorageError> {
        let bytes = fs::read(self.absolute(relative_path)).await?;
        Ok(bytes)
    }

    /// Removes a stored file
    ///
    /// A file that is already gone is not an error; the database row is the
    /// source of truth and the disk may lag behind a crashed delete.
    pub async fn remove(&self, relative_path: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.absolute(relative_path)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename_plain() {
        assert_eq!(sanitize_filename("report.pdf"), "report.pdf");
        assert_eq!(sanitize_filename("My File (1).txt"), "My_File__1_.txt");
    }

    #[test]
    fn test_sanitize_filename_strips_paths() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("dir/sub/notes.txt"), "notes.txt");
        assert_eq!(sanitize_filename("C:\\Users\\x\\a.doc"), "a.doc");
    }

    #[test]
    fn test_sanitize_filename_hidden_files() {
        assert_eq!(sanitize_filename(".hidden"), "hidden");
        assert_eq!(sanitize_filename("..."), "");
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("a.PDF"), ".pdf");
        assert_eq!(file_extension("archive.tar.gz"), ".gz");
        assert_eq!(file_extension("noext"), "");
        assert_eq!(file_extension(".bashrc"), "");
    }

    #[test]
    fn test_extension_allowed() {
        assert!(extension_allowed("doc.pdf", ALLOWED_ATTACHMENT_EXTENSIONS));
        assert!(extension_allowed("photo.JPEG", ALLOWED_ATTACHMENT_EXTENSIONS));
        assert!(!extension_allowed("run.exe", ALLOWED_ATTACHMENT_EXTENSIONS));
        assert!(!extension_allowed("noext", ALLOWED_ATTACHMENT_EXTENSIONS));
    }

    #[test]
    fn test_avatar_extensions_are_images_only() {
        assert!(extension_allowed("me.png", ALLOWED_AVATAR_EXTENSIONS));
        assert!(!extension_allowed("me.pdf", ALLOWED_AVATAR_EXTENSIONS));
    }

    #[test]
    fn test_is_image_filename() {
        assert!(is_image_filename("photo.jpg"));
        assert!(is_image_filename("photo.gif"));
        assert!(!is_image_filename("doc.pdf"));
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(1023), "1023 B");
        assert_eq!(format_file_size(1024), "1.0 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(1024 * 1024), "1.0 MB");
        assert_eq!(format_file_size(-5), "0 B");
    }

    #[test]
    fn test_attachment_path_shape() {
        let store = FileStore::new("/tmp/uploads");
        let task_id = Uuid::new_v4();
        let path = store.attachment_path(task_id, "notes.txt").unwrap();
        assert_eq!(path, format!("task_attachments/{}/notes.txt", task_id));
    }

    #[test]
    fn test_attachment_path_rejects_bad_extension() {
        let store = FileStore::new("/tmp/uploads");
        let err = store.attachment_path(Uuid::new_v4(), "malware.exe");
        assert!(matches!(err, Err(StorageError::ExtensionNotAllowed(_))));
    }

    #[test]
    fn test_attachment_path_rejects_empty() {
        let store = FileStore::new("/tmp/uploads");
        let err = store.attachment_path(Uuid::new_v4(), "...");
        assert!(matches!(err, Err(StorageError::InvalidFilename)));
    }

    #[tokio::test]
    async fn test_save_read_remove_roundtrip() {
        let root = std::env::temp_dir().join(format!("tasknest-store-{}", Uuid::new_v4()));
        let store = FileStore::new(&root);

        let rel = format!("task_attachments/{}/notes.txt", Uuid::new_v4());
        store.save(&rel, b"hello").await.unwrap();
        assert_eq!(store.read(&rel).await.unwrap(), b"hello");

        store.remove(&rel).await.unwrap();
        assert!(store.read(&rel).await.is_err());

        // Removing twice is fine
        store.remove(&rel).await.unwrap();

        let _ = tokio::fs::remove_dir_all(&root).await;
    }
}
