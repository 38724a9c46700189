use crate::ImageHandle;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("image payload is empty")]
    Empty,
    #[error("failed to decode image from {source_url}: {message}")]
    DecodeFailure { source_url: String, message: String },
}

/// Decode encoded image bytes (any enabled format) into an RGBA8 handle.
pub fn decode_image(source_url: &str, bytes: &[u8]) -> Result<ImageHandle, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }
    let dyn_img = image::load_from_memory(bytes).map_err(|err| DecodeError::DecodeFailure {
        source_url: source_url.to_string(),
        message: err.to_string(),
    })?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(DecodeError::Empty);
    }
    Ok(ImageHandle::new(source_url, width, height, rgba.into_raw()))
}
