use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};

use crate::error::ImageError;

pub const MAX_IMAGE_SIZE: usize = 5 * 1024 * 1024; // 5MB

/// Checks an item image reference. Remote URLs pass through untouched;
/// inline `data:` URLs must carry a base64 payload within the size limit.
pub fn validate(image: &str) -> Result<(), ImageError> {
    if image.starts_with("http://") || image.starts_with("https://") {
        return Ok(());
    }

    let rest = image
        .strip_prefix("data:")
        .ok_or(ImageError::UnsupportedScheme)?;
    let (header, payload) = rest.split_once(',').ok_or(ImageError::MalformedDataUrl)?;
    if !header.ends_with(";base64") {
        return Err(ImageError::MalformedDataUrl);
    }

    // Cheap upper bound before decoding: 4 chars of base64 per 3 bytes.
    if payload.len() / 4 * 3 > MAX_IMAGE_SIZE + 3 {
        return Err(ImageError::TooLarge { max: MAX_IMAGE_SIZE });
    }

    let bytes = BASE64
        .decode(payload)
        .map_err(|_| ImageError::InvalidEncoding)?;
    if bytes.len() > MAX_IMAGE_SIZE {
        return Err(ImageError::TooLarge { max: MAX_IMAGE_SIZE });
    }

    Ok(())
}
