use std::fmt;
use std::sync::{Arc, OnceLock};

pub const PLACEHOLDER_SOURCE: &str = "builtin:placeholder";

/// Decoded RGBA8 pixels plus the URL they came from.
#[derive(Debug, PartialEq, Eq)]
pub struct ImageData {
    pub source: String,
    pub width: u32,
    pub height: u32,
    pub rgba8: Vec<u8>,
}

/// Cheap shared reference to a decoded image. Two handles are equal when they
/// point at the same decoded image.
#[derive(Clone)]
pub struct ImageHandle {
    inner: Arc<ImageData>,
}

impl ImageHandle {
    pub fn new(source: impl Into<String>, width: u32, height: u32, rgba8: Vec<u8>) -> Self {
        Self {
            inner: Arc::new(ImageData {
                source: source.into(),
                width,
                height,
                rgba8,
            }),
        }
    }

    /// Built-in image shown when a scene resolves no pictures.
    pub fn placeholder() -> Self {
        static PLACEHOLDER: OnceLock<ImageHandle> = OnceLock::new();
        PLACEHOLDER
            .get_or_init(|| ImageHandle::new(PLACEHOLDER_SOURCE, 1, 1, vec![0x80, 0x80, 0x80, 0xff]))
            .clone()
    }

    pub fn is_placeholder(&self) -> bool {
        self.inner.source == PLACEHOLDER_SOURCE
    }

    pub fn source(&self) -> &str {
        &self.inner.source
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.inner.width, self.inner.height)
    }

    pub fn data(&self) -> &ImageData {
        &self.inner
    }
}

impl PartialEq for ImageHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for ImageHandle {}

impl fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageHandle")
            .field("source", &self.inner.source)
            .field("width", &self.inner.width)
            .field("height", &self.inner.height)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub bytes: Vec<u8>,
    pub metadata: FetchMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    pub original_url: String,
    pub final_url: String,
    pub content_type: Option<String>,
    pub byte_len: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    UnsupportedContentType { content_type: String },
    EmptyBody,
    Decode,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::UnsupportedContentType { content_type } => {
                write!(f, "unsupported content type {content_type}")
            }
            FailureKind::EmptyBody => write!(f, "empty body"),
            FailureKind::Decode => write!(f, "image decode error"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ImageHandle, PLACEHOLDER_SOURCE};

    #[test]
    fn handles_compare_by_identity() {
        let a = ImageHandle::new("u1", 1, 1, vec![0, 0, 0, 255]);
        let b = ImageHandle::new("u1", 1, 1, vec![0, 0, 0, 255]);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn placeholder_is_shared() {
        let placeholder = ImageHandle::placeholder();
        assert_eq!(placeholder, ImageHandle::placeholder());
        assert!(placeholder.is_placeholder());
        assert_eq!(placeholder.source(), PLACEHOLDER_SOURCE);
        assert_eq!(placeholder.dimensions(), (1, 1));
    }
}
