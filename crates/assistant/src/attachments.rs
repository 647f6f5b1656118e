//! File attachments for chat prompts: size/type validation and the base64
//! payload. The payload is encoded up front but not yet carried by the
//! outgoing request; only the filename annotation reaches the backend.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::Path;
use thiserror::Error;

/// Hard cap checked before any read of the file body is encoded.
pub const MAX_ATTACHMENT_BYTES: u64 = 5 * 1024 * 1024;

/// Mirrors the picker filter: images plus a few document types.
pub const ACCEPTED_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "webp", "pdf", "doc", "docx", "txt",
];

#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("file is {size} bytes; the limit is 5 MiB")]
    TooLarge { size: u64 },
    #[error("unsupported file type: {name}")]
    Unsupported { name: String },
    #[error("could not read file: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct Attachment {
    pub name: String,
    pub size: u64,
    /// Base64 (standard alphabet) of the full file body.
    pub encoded: String,
}

impl Attachment {
    pub fn from_bytes(name: impl Into<String>, bytes: &[u8]) -> Result<Self, AttachmentError> {
        let name = name.into();
        let size = bytes.len() as u64;
        if size > MAX_ATTACHMENT_BYTES {
            return Err(AttachmentError::TooLarge { size });
        }
        let extension = Path::new(&name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        if !ACCEPTED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(AttachmentError::Unsupported { name });
        }
        Ok(Self {
            size,
            encoded: STANDARD.encode(bytes),
            name,
        })
    }

    /// Read and encode a file from disk. The size check runs against file
    /// metadata so an oversized file is rejected without being read.
    pub fn load(path: &Path) -> Result<Self, AttachmentError> {
        let size = std::fs::metadata(path)?.len();
        if size > MAX_ATTACHMENT_BYTES {
            return Err(AttachmentError::TooLarge { size });
        }
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("file")
            .to_string();
        let bytes = std::fs::read(path)?;
        Self::from_bytes(name, &bytes)
    }

    /// Displayed content for a prompt submitted with this file attached.
    pub fn annotate(&self, prompt: &str) -> String {
        if prompt.is_empty() {
            format!("(File: {})", self.name)
        } else {
            format!("{} (File: {})", prompt, self.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_small_text_file_is_encoded() {
        let attachment = Attachment::from_bytes("notes.txt", b"hello world").unwrap();
        assert_eq!(attachment.name, "notes.txt");
        assert_eq!(attachment.size, 11);
        assert_eq!(attachment.encoded, STANDARD.encode(b"hello world"));
    }

    #[test]
    fn test_file_over_limit_is_rejected_before_encoding() {
        let bytes = vec![0u8; (MAX_ATTACHMENT_BYTES + 1) as usize];
        let err = Attachment::from_bytes("big.pdf", &bytes).unwrap_err();
        assert!(matches!(
            err,
            AttachmentError::TooLarge { size } if size == MAX_ATTACHMENT_BYTES + 1
        ));
    }

    #[test]
    fn test_file_at_limit_is_accepted() {
        let bytes = vec![0u8; MAX_ATTACHMENT_BYTES as usize];
        assert!(Attachment::from_bytes("exactly.txt", &bytes).is_ok());
    }

    #[test]
    fn test_unsupported_extension_is_rejected() {
        let err = Attachment::from_bytes("tool.exe", b"MZ").unwrap_err();
        assert!(matches!(err, AttachmentError::Unsupported { .. }));
    }

    #[test]
    fn test_annotate_appends_filename() {
        let attachment = Attachment::from_bytes("report.pdf", b"%PDF").unwrap();
        assert_eq!(
            attachment.annotate("Summarize this"),
            "Summarize this (File: report.pdf)"
        );
        assert_eq!(attachment.annotate(""), "(File: report.pdf)");
    }

    #[test]
    fn test_load_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"on disk").unwrap();

        let attachment = Attachment::load(&path).unwrap();
        assert_eq!(attachment.name, "sample.txt");
        assert_eq!(attachment.encoded, STANDARD.encode(b"on disk"));
    }
}
