//! Generated media and its data-URI encoding

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// PNG mime type
pub const MIME_PNG: &str = "image/png";
/// SVG mime type, produced by the chart renderer
pub const MIME_SVG: &str = "image/svg+xml";
/// MP4 mime type
pub const MIME_MP4: &str = "video/mp4";

/// Bytes produced by an image or video backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaPayload {
    /// Mime type reported by the backend
    pub mime_type: String,
    /// Raw media bytes
    pub bytes: Vec<u8>,
}

impl MediaPayload {
    /// Create a payload
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// PNG payload
    pub fn png(bytes: Vec<u8>) -> Self {
        Self::new(MIME_PNG, bytes)
    }

    /// MP4 payload
    pub fn mp4(bytes: Vec<u8>) -> Self {
        Self::new(MIME_MP4, bytes)
    }

    /// Whether the payload carries any bytes
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// `data:<mime>;base64,<payload>`
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }
}
