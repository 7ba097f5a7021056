//! Source and processed image representations.

use base64::{engine::general_purpose, Engine as _};
use bytes::Bytes;
use image::ImageFormat;
use std::borrow::Cow;
use std::fs;
use std::path::Path;
use uuid::Uuid;

use crate::common::contract::PNG_DATA_URI_PREFIX;
use crate::error::{ExchangeError, Result};

/// Fallback MIME type when the bytes are not a recognised image.
pub(crate) const OCTET_STREAM: &str = "application/octet-stream";

/// The image the user picked. No validation is done on type or size.
#[derive(Debug, Clone)]
pub struct SourceImage {
    file_name: String,
    bytes: Bytes,
    mime_type: &'static str,
}

impl SourceImage {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let bytes = bytes.into();
        let mime_type = guess_mime_type(&bytes);
        Self {
            file_name: file_name.into(),
            bytes,
            mime_type,
        }
    }

    /// Reads a file from disk. The file name part of `path` becomes the upload name.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Ok(Self::new(file_name, bytes))
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// MIME type guessed from the leading bytes.
    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// MIME types reported for the formats `image` can sniff.
pub(crate) const MIME_TYPES: &[(ImageFormat, &str)] = &[
    (ImageFormat::Png, "image/png"),
    (ImageFormat::Jpeg, "image/jpeg"),
    (ImageFormat::Gif, "image/gif"),
    (ImageFormat::WebP, "image/webp"),
    (ImageFormat::Bmp, "image/bmp"),
    (ImageFormat::Tiff, "image/tiff"),
    (ImageFormat::Ico, "image/x-icon"),
];

/// Guesses a MIME type from magic bytes, falling back to `application/octet-stream`.
pub fn guess_mime_type(bytes: &[u8]) -> &'static str {
    image::guess_format(bytes)
        .ok()
        .and_then(|format| {
            MIME_TYPES
                .iter()
                .find(|(known, _)| *known == format)
                .map(|(_, mime)| *mime)
        })
        .unwrap_or(OCTET_STREAM)
}

/// The image returned by the backend, in whichever form the contract produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessedImage {
    /// Raw response body, addressable through a process-local object reference.
    Blob {
        id: Uuid,
        bytes: Bytes,
        content_type: Option<String>,
    },
    /// `data:image/png;base64,...` built from a JSON response.
    DataUri(String),
}

impl ProcessedImage {
    pub fn from_blob(bytes: impl Into<Bytes>, content_type: Option<String>) -> Self {
        ProcessedImage::Blob {
            id: Uuid::new_v4(),
            bytes: bytes.into(),
            content_type,
        }
    }

    /// Wraps a base64 PNG payload in a data URI. The payload is not touched.
    pub fn from_base64_png(payload: &str) -> Self {
        ProcessedImage::DataUri(format!("{}{}", PNG_DATA_URI_PREFIX, payload))
    }

    /// Reference to hand to whatever displays the image.
    ///
    /// Blobs get an object URL that only means something inside this process;
    /// data URIs are returned verbatim.
    pub fn source(&self) -> String {
        match self {
            ProcessedImage::Blob { id, .. } => format!("blob:photo-exchange/{}", id),
            ProcessedImage::DataUri(uri) => uri.clone(),
        }
    }

    /// MIME type of the image, if known.
    pub fn content_type(&self) -> Option<&str> {
        match self {
            ProcessedImage::Blob { content_type, .. } => content_type.as_deref(),
            ProcessedImage::DataUri(uri) => uri
                .strip_prefix("data:")
                .and_then(|rest| rest.split([';', ',']).next())
                .filter(|mime| !mime.is_empty()),
        }
    }

    /// Resolves the image bytes behind [`ProcessedImage::source`].
    pub fn bytes(&self) -> Result<Cow<'_, [u8]>> {
        match self {
            ProcessedImage::Blob { bytes, .. } => Ok(Cow::Borrowed(&bytes[..])),
            ProcessedImage::DataUri(uri) => {
                let (header, payload) = uri
                    .strip_prefix("data:")
                    .and_then(|rest| rest.split_once(','))
                    .ok_or_else(|| ExchangeError::InvalidDataUri("missing 'data:' header".to_string()))?;
                if !header.ends_with(";base64") {
                    return Err(ExchangeError::InvalidDataUri(format!(
                        "unsupported encoding in '{}'",
                        header
                    )));
                }
                general_purpose::STANDARD
                    .decode(payload)
                    .map(Cow::Owned)
                    .map_err(|e| ExchangeError::InvalidDataUri(e.to_string()))
            }
        }
    }

    /// Writes the resolved bytes to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.bytes()?;
        fs::write(path, &*bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
    const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10, b'J', b'F', b'I', b'F'];

    #[test]
    fn test_mime_guessing() {
        assert_eq!(guess_mime_type(PNG_MAGIC), "image/png");
        assert_eq!(guess_mime_type(JPEG_MAGIC), "image/jpeg");
        assert_eq!(guess_mime_type(b"not an image"), "application/octet-stream");
        assert_eq!(guess_mime_type(&[]), "application/octet-stream");
    }

    #[test]
    fn test_source_from_path_keeps_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.jpg");
        std::fs::write(&path, JPEG_MAGIC).unwrap();

        let source = SourceImage::from_path(&path).unwrap();
        assert_eq!(source.file_name(), "photo.jpg");
        assert_eq!(source.mime_type(), "image/jpeg");
        assert_eq!(&source.bytes()[..], JPEG_MAGIC);
    }

    #[test]
    fn test_source_from_missing_path() {
        let err = SourceImage::from_path("/definitely/not/here.png").unwrap_err();
        assert!(matches!(err, ExchangeError::Io(_)));
    }

    #[test]
    fn test_data_uri_keeps_payload_verbatim() {
        // Not valid base64 on purpose: the payload must not be inspected or rewritten.
        let image = ProcessedImage::from_base64_png("ab+/==x");
        assert_eq!(image.source(), "data:image/png;base64,ab+/==x");
        assert_eq!(image.content_type(), Some("image/png"));
    }

    #[test]
    fn test_data_uri_resolves_bytes() {
        let payload = general_purpose::STANDARD.encode(PNG_MAGIC);
        let image = ProcessedImage::from_base64_png(&payload);
        assert_eq!(image.bytes().unwrap().into_owned(), PNG_MAGIC);
    }

    #[test]
    fn test_malformed_data_uri() {
        let image = ProcessedImage::DataUri("data:image/png,plain".to_string());
        assert!(matches!(image.bytes(), Err(ExchangeError::InvalidDataUri(_))));

        let image = ProcessedImage::DataUri("http://example.com/a.png".to_string());
        assert!(matches!(image.bytes(), Err(ExchangeError::InvalidDataUri(_))));
    }

    #[test]
    fn test_blob_source_is_stable_and_unique() {
        let a = ProcessedImage::from_blob(JPEG_MAGIC.to_vec(), Some("image/jpeg".to_string()));
        let b = ProcessedImage::from_blob(JPEG_MAGIC.to_vec(), None);

        assert!(a.source().starts_with("blob:photo-exchange/"));
        assert_eq!(a.source(), a.source());
        assert_ne!(a.source(), b.source());
        assert_eq!(a.content_type(), Some("image/jpeg"));
        assert_eq!(b.content_type(), None);
        assert_eq!(a.bytes().unwrap().into_owned(), JPEG_MAGIC);
    }

    #[test]
    fn test_save_writes_resolved_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let payload = general_purpose::STANDARD.encode(PNG_MAGIC);

        ProcessedImage::from_base64_png(&payload).save(&path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), PNG_MAGIC);
    }
}
