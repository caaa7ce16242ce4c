use std::path::Path;

use base64::Engine;
use image::ImageFormat;

use crate::error::{AiError, Result};

/// Raw image bytes plus the MIME type the providers need to label them.
#[derive(Debug, Clone)]
pub struct ImageInput {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl ImageInput {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    /// Read an image from disk. The MIME type comes from the file extension,
    /// or from the leading bytes when the extension is missing or unknown.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| AiError::Image(format!("Failed to read {}: {}", path.display(), e)))?;

        if bytes.is_empty() {
            return Err(AiError::Image(format!("Image is empty: {}", path.display())));
        }

        let mime_type = mime_type_for(path)
            .or_else(|| sniff_mime_type(&bytes))
            .ok_or_else(|| {
                AiError::Image(format!("Unsupported image type: {}", path.display()))
            })?;

        Ok(Self::new(bytes, mime_type))
    }

    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }
}

/// Map a file extension to one of the image MIME types vision models accept.
pub fn mime_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// Recognise JPEG, PNG, GIF or WebP from magic bytes.
pub fn sniff_mime_type(bytes: &[u8]) -> Option<&'static str> {
    match image::guess_format(bytes).ok()? {
        ImageFormat::Jpeg => Some("image/jpeg"),
        ImageFormat::Png => Some("image/png"),
        ImageFormat::Gif => Some("image/gif"),
        ImageFormat::WebP => Some("image/webp"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_mime_type_for_known_extensions() {
        assert_eq!(mime_type_for(Path::new("skirt.JPG")), Some("image/jpeg"));
        assert_eq!(mime_type_for(Path::new("a/b/coat.png")), Some("image/png"));
        assert_eq!(mime_type_for(Path::new("scarf.webp")), Some("image/webp"));
    }

    #[test]
    fn test_mime_type_for_unknown_extension() {
        assert_eq!(mime_type_for(Path::new("notes.txt")), None);
        assert_eq!(mime_type_for(Path::new("no_extension")), None);
    }

    #[test]
    fn test_from_path_reads_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shirt.png");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(&[0x89, b'P', b'N', b'G'])
            .unwrap();

        let image = tokio_test::block_on(ImageInput::from_path(&path)).unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.bytes.len(), 4);
        assert_eq!(image.to_base64(), "iVBORw==");
    }

    #[test]
    fn test_from_path_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = tokio_test::block_on(ImageInput::from_path(dir.path().join("gone.jpg")))
            .unwrap_err();
        assert!(matches!(err, AiError::Image(_)));
    }

    #[test]
    fn test_sniff_mime_type_from_magic_bytes() {
        assert_eq!(
            sniff_mime_type(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F']),
            Some("image/jpeg")
        );
        assert_eq!(
            sniff_mime_type(b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR"),
            Some("image/png")
        );
        assert_eq!(sniff_mime_type(b"GIF89a\x01\0\x01\0"), Some("image/gif"));
        assert_eq!(
            sniff_mime_type(b"RIFF\x24\0\0\0WEBPVP8 "),
            Some("image/webp")
        );
        assert_eq!(sniff_mime_type(b"just some text"), None);
    }

    #[test]
    fn test_from_path_without_extension_uses_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("IMG_0001");
        std::fs::write(&path, [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F']).unwrap();

        let image = tokio_test::block_on(ImageInput::from_path(&path)).unwrap();
        assert_eq!(image.mime_type, "image/jpeg");
    }

    #[test]
    fn test_from_path_unknown_extension_uses_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coat.heic_export");
        std::fs::write(&path, b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR").unwrap();

        let image = tokio_test::block_on(ImageInput::from_path(&path)).unwrap();
        assert_eq!(image.mime_type, "image/png");
    }

    #[test]
    fn test_from_path_rejects_non_image_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"not a picture").unwrap();

        let err = tokio_test::block_on(ImageInput::from_path(&path)).unwrap_err();
        assert!(err.to_string().contains("Unsupported image type"));
    }

    #[test]
    fn test_from_path_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.jpg");
        std::fs::File::create(&path).unwrap();

        let err = tokio_test::block_on(ImageInput::from_path(&path)).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }
}
