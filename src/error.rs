use thiserror::Error;

use crate::models::ItemStatus;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ImageError {
    #[error("Unsupported image reference")]
    UnsupportedScheme,
    #[error("Malformed data URL")]
    MalformedDataUrl,
    #[error("Image payload is not valid base64")]
    InvalidEncoding,
    #[error("Image exceeds maximum allowed size of {max} bytes")]
    TooLarge { max: usize },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Items cannot be reported as {}", .0.as_str())]
    UnreportableStatus(ItemStatus),
    #[error("Invalid image: {0}")]
    Image(#[from] ImageError),
}
