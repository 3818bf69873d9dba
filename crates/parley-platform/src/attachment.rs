//! Image attachments as data URIs.
//!
//! Conversations store images the way a browser `FileReader` produces
//! them: `data:<mime>;base64,<payload>`.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use parley_common::PlatformError;

/// Largest image accepted for upload (the Gemini inline-data limit).
pub const MAX_IMAGE_BYTES: usize = 20 * 1024 * 1024;

/// A decoded view of a `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri<'a> {
    pub mime_type: &'a str,
    /// Base64 payload, still encoded.
    pub data: &'a str,
}

impl<'a> DataUri<'a> {
    /// Parse a base64 `data:` URI. Returns `None` for anything else.
    pub fn parse(uri: &'a str) -> Option<Self> {
        let rest = uri.strip_prefix("data:")?;
        let (header, data) = rest.split_once(',')?;
        let mime_type = header.strip_suffix(";base64")?;
        if mime_type.is_empty() || data.is_empty() {
            return None;
        }
        Some(Self { mime_type, data })
    }
}

/// Guess an image MIME type from a file extension.
pub fn image_mime_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "heic" => Some("image/heic"),
        _ => None,
    }
}

/// Encode raw bytes as a base64 data URI.
pub fn encode_data_uri(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{mime_type};base64,{}", STANDARD.encode(bytes))
}

/// Read an image file into a data URI.
pub fn load_image(path: &Path) -> Result<String, PlatformError> {
    let mime = image_mime_type(path).ok_or_else(|| {
        PlatformError::AttachmentError(format!("unsupported image type: {}", path.display()))
    })?;

    let bytes = std::fs::read(path).map_err(|e| {
        PlatformError::AttachmentError(format!("failed to read {}: {e}", path.display()))
    })?;

    if bytes.is_empty() {
        return Err(PlatformError::AttachmentError(format!(
            "{} is empty",
            path.display()
        )));
    }
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(PlatformError::AttachmentError(format!(
            "{} is {} bytes, limit is {MAX_IMAGE_BYTES}",
            path.display(),
            bytes.len()
        )));
    }

    tracing::debug!(path = %path.display(), size = bytes.len(), mime, "Loaded image attachment");
    Ok(encode_data_uri(mime, &bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_data_uri() {
        let uri = "data:image/png;base64,iVBORw0KGgo=";
        let parsed = DataUri::parse(uri).unwrap();
        assert_eq!(parsed.mime_type, "image/png");
        assert_eq!(parsed.data, "iVBORw0KGgo=");
    }

    #[test]
    fn parse_rejects_non_base64_uri() {
        assert!(DataUri::parse("data:text/plain,hello").is_none());
        assert!(DataUri::parse("https://example.com/cat.png").is_none());
        assert!(DataUri::parse("data:;base64,AAAA").is_none());
        assert!(DataUri::parse("data:image/png;base64,").is_none());
    }

    #[test]
    fn mime_type_from_extension() {
        assert_eq!(image_mime_type(Path::new("a/cat.PNG")), Some("image/png"));
        assert_eq!(image_mime_type(Path::new("dog.jpeg")), Some("image/jpeg"));
        assert_eq!(image_mime_type(Path::new("notes.txt")), None);
        assert_eq!(image_mime_type(Path::new("noext")), None);
    }

    #[test]
    fn load_image_produces_data_uri() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pixel.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let uri = load_image(&path).unwrap();
        assert_eq!(uri, "data:image/png;base64,iVBORw==");
        let parsed = DataUri::parse(&uri).unwrap();
        assert_eq!(STANDARD.decode(parsed.data).unwrap(), vec![0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn load_image_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.pdf");
        std::fs::write(&path, b"%PDF").unwrap();

        let err = load_image(&path).unwrap_err();
        assert!(err.to_string().contains("unsupported image type"));
    }

    #[test]
    fn load_image_rejects_missing_and_empty_files() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_image(&dir.path().join("missing.png")).is_err());

        let empty = dir.path().join("empty.jpg");
        std::fs::write(&empty, b"").unwrap();
        let err = load_image(&empty).unwrap_err();
        assert!(err.to_string().contains("is empty"));
    }
}
