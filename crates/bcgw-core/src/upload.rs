//! Pre-flight validation for image uploads.
//!
//! Both checks run locally before any upstream call: an oversized or
//! wrongly-typed payload is rejected with 400 without contacting
//! BigCommerce at all.

use thiserror::Error;

/// Upstream ceiling for image payloads: 8 MiB.
pub const MAX_IMAGE_BYTES: usize = 8 * 1024 * 1024;

/// File extensions BigCommerce accepts for product images.
pub const ALLOWED_IMAGE_EXTENSIONS: [&str; 8] =
    ["bmp", "gif", "jpeg", "jpg", "png", "wbmp", "xbm", "webp"];

/// An image payload about to be forwarded upstream as multipart form data.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadRejection {
    #[error("The image size is too large. The maximum allowed size is 8MB.")]
    TooLarge,
    #[error("The image file type is not supported. Supported file types are bmp, gif, jpeg, jpg, png, wbmp, xbm, and webp.")]
    UnsupportedExtension,
}

/// Checks size first, then extension, mirroring the order callers see in
/// rejection messages.
///
/// # Errors
///
/// Returns [`UploadRejection::TooLarge`] for payloads over
/// [`MAX_IMAGE_BYTES`] and [`UploadRejection::UnsupportedExtension`] for
/// file names whose extension is outside [`ALLOWED_IMAGE_EXTENSIONS`].
pub fn validate_image_upload(file_name: &str, len: usize) -> Result<(), UploadRejection> {
    if len > MAX_IMAGE_BYTES {
        return Err(UploadRejection::TooLarge);
    }

    let allowed = extension(file_name).is_some_and(|ext| {
        ALLOWED_IMAGE_EXTENSIONS
            .iter()
            .any(|candidate| ext.eq_ignore_ascii_case(candidate))
    });

    if allowed {
        Ok(())
    } else {
        Err(UploadRejection::UnsupportedExtension)
    }
}

fn extension(file_name: &str) -> Option<&str> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_every_allowed_extension() {
        for ext in ALLOWED_IMAGE_EXTENSIONS {
            let name = format!("photo.{ext}");
            assert_eq!(validate_image_upload(&name, 1024), Ok(()), "{name}");
        }
    }

    #[test]
    fn accepts_uppercase_extensions() {
        assert_eq!(validate_image_upload("PHOTO.PNG", 1024), Ok(()));
    }

    #[test]
    fn rejects_disallowed_extension() {
        assert_eq!(
            validate_image_upload("archive.tiff", 1024),
            Err(UploadRejection::UnsupportedExtension)
        );
    }

    #[test]
    fn rejects_missing_extension() {
        assert_eq!(
            validate_image_upload("noextension", 1024),
            Err(UploadRejection::UnsupportedExtension)
        );
        assert_eq!(
            validate_image_upload(".png", 1024),
            Err(UploadRejection::UnsupportedExtension),
            "bare dotfile has no stem"
        );
    }

    #[test]
    fn accepts_exactly_the_ceiling() {
        assert_eq!(validate_image_upload("a.png", MAX_IMAGE_BYTES), Ok(()));
    }

    #[test]
    fn rejects_one_byte_over_the_ceiling() {
        assert_eq!(
            validate_image_upload("a.png", MAX_IMAGE_BYTES + 1),
            Err(UploadRejection::TooLarge)
        );
    }

    #[test]
    fn size_check_runs_before_extension_check() {
        // An oversized payload with a bad extension reports the size problem.
        assert_eq!(
            validate_image_upload("a.tiff", MAX_IMAGE_BYTES + 1),
            Err(UploadRejection::TooLarge)
        );
    }
}
