//! Replacement logo decoding
//!
//! The client sends the logo either as raw base64 or as a
//! `data:image/...;base64,` URL. Both are decoded once per request and
//! shared by reference across every detection.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use image::{DynamicImage, ImageFormat};
use thiserror::Error;

use crate::compositor::NativeSize;

/// Errors raised while turning the `replace_logo` field into an image
#[derive(Debug, Error)]
pub enum ReplacementImageError {
    #[error("Invalid base64 in replacement logo: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("Failed to decode replacement logo: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Replacement logo has no pixels ({width}x{height})")]
    Empty { width: u32, height: u32 },
}

/// Decoded replacement logo
#[derive(Debug)]
pub struct ReplacementImage {
    bytes: Vec<u8>,
    image: DynamicImage,
    format: Option<ImageFormat>,
}

impl ReplacementImage {
    /// Decode a base64 string or data URL
    pub fn from_encoded(value: &str) -> Result<Self, ReplacementImageError> {
        let payload: String = strip_data_url(value)
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        let bytes = BASE64.decode(payload.as_bytes())?;
        Self::from_bytes(bytes)
    }

    /// Decode raw image file bytes (PNG, JPEG, ...)
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, ReplacementImageError> {
        let format = image::guess_format(&bytes).ok();
        let image = image::load_from_memory(&bytes)?;
        if image.width() == 0 || image.height() == 0 {
            return Err(ReplacementImageError::Empty {
                width: image.width(),
                height: image.height(),
            });
        }
        Ok(Self {
            bytes,
            image,
            format,
        })
    }

    /// Pixel dimensions of the decoded image
    pub fn native_size(&self) -> NativeSize {
        NativeSize::new(self.image.width(), self.image.height())
    }

    /// Original encoded bytes
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// Container format sniffed from the magic bytes
    pub fn format(&self) -> Option<ImageFormat> {
        self.format
    }
}

/// Drop a `data:image/...;base64,` prefix, leaving plain base64 untouched
pub fn strip_data_url(value: &str) -> &str {
    let trimmed = value.trim();
    if trimmed.starts_with("data:image") {
        match trimmed.split_once(',') {
            Some((_, payload)) => payload,
            None => "",
        }
    } else {
        trimmed
    }
}
