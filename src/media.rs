//! Media normalization and base64 encoding.
//!
//! Images are flattened to RGB and re-encoded as JPEG regardless of how they
//! arrived; video bytes are passed through untouched.

use std::fmt;
use std::io::Cursor;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, GrayImage, ImageFormat, RgbImage, RgbaImage};
use log::debug;

use crate::FlavorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Video containers accepted by the vision model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VideoFormat {
    #[default]
    Mp4,
    Mov,
    Mkv,
    Webm,
}

impl VideoFormat {
    /// Wire name of the container
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoFormat::Mp4 => "mp4",
            VideoFormat::Mov => "mov",
            VideoFormat::Mkv => "mkv",
            VideoFormat::Webm => "webm",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "mp4" | "m4v" => Some(VideoFormat::Mp4),
            "mov" | "qt" => Some(VideoFormat::Mov),
            "mkv" => Some(VideoFormat::Mkv),
            "webm" => Some(VideoFormat::Webm),
            _ => None,
        }
    }

    /// Guess the container from a file name. Names without an extension are
    /// assumed to be MP4.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FlavorError> {
        match path.as_ref().extension().and_then(|e| e.to_str()) {
            None => Ok(VideoFormat::Mp4),
            Some(ext) => Self::from_extension(ext).ok_or_else(|| {
                FlavorError::UnsupportedMedia(format!("video container '.{}'", ext))
            }),
        }
    }
}

/// A single piece of user media, owned for the duration of one request
#[derive(Debug, Clone)]
pub enum Media {
    /// Decoded image buffer
    Image(DynamicImage),
    /// Raw video container bytes
    Video { data: Vec<u8>, format: VideoFormat },
}

impl Media {
    /// Build an image from a raw pixel array.
    ///
    /// `channels` is 1 for a 2-D grayscale array, 3 for RGB and 4 for RGBA.
    pub fn from_pixels(
        width: u32,
        height: u32,
        channels: u8,
        data: Vec<u8>,
    ) -> Result<Self, FlavorError> {
        if width == 0 || height == 0 || data.is_empty() {
            return Err(FlavorError::NoMedia);
        }

        let mismatch = || {
            FlavorError::UnsupportedMedia(format!(
                "pixel buffer does not match {}x{}x{}",
                width, height, channels
            ))
        };

        let image = match channels {
            1 => DynamicImage::ImageLuma8(
                GrayImage::from_raw(width, height, data).ok_or_else(mismatch)?,
            ),
            3 => DynamicImage::ImageRgb8(
                RgbImage::from_raw(width, height, data).ok_or_else(mismatch)?,
            ),
            4 => DynamicImage::ImageRgba8(
                RgbaImage::from_raw(width, height, data).ok_or_else(mismatch)?,
            ),
            other => {
                return Err(FlavorError::UnsupportedMedia(format!(
                    "{} channel images",
                    other
                )))
            }
        };

        Ok(Media::Image(image))
    }

    /// Decode an encoded image (JPEG, PNG, GIF or WebP).
    pub fn image_from_bytes(bytes: &[u8]) -> Result<Self, FlavorError> {
        if bytes.is_empty() {
            return Err(FlavorError::NoMedia);
        }
        Ok(Media::Image(image::load_from_memory(bytes)?))
    }

    pub async fn image_file(path: impl AsRef<Path>) -> Result<Self, FlavorError> {
        let bytes = tokio::fs::read(path.as_ref()).await?;
        Self::image_from_bytes(&bytes)
    }

    pub fn video(data: Vec<u8>, format: VideoFormat) -> Result<Self, FlavorError> {
        if data.is_empty() {
            return Err(FlavorError::NoMedia);
        }
        Ok(Media::Video { data, format })
    }

    pub async fn video_file(path: impl AsRef<Path>) -> Result<Self, FlavorError> {
        let path = path.as_ref();
        let format = VideoFormat::from_path(path)?;
        let data = tokio::fs::read(path).await?;
        Self::video(data, format)
    }

    pub fn kind(&self) -> MediaKind {
        match self {
            Media::Image(_) => MediaKind::Image,
            Media::Video { .. } => MediaKind::Video,
        }
    }

    /// Normalize and base64-encode the payload.
    pub fn encode(&self) -> Result<EncodedMedia, FlavorError> {
        match self {
            Media::Image(image) => {
                let jpeg = to_jpeg(image)?;
                debug!(
                    "Encoded {}x{} image as {} bytes of JPEG",
                    image.width(),
                    image.height(),
                    jpeg.len()
                );
                Ok(EncodedMedia {
                    kind: MediaKind::Image,
                    format: "jpeg".to_string(),
                    data: STANDARD.encode(&jpeg),
                })
            }
            Media::Video { data, format } => {
                if data.is_empty() {
                    return Err(FlavorError::NoMedia);
                }
                debug!("Encoding {} bytes of {} video", data.len(), format.as_str());
                Ok(EncodedMedia {
                    kind: MediaKind::Video,
                    format: format.as_str().to_string(),
                    data: STANDARD.encode(data),
                })
            }
        }
    }
}

/// Media ready to embed in a JSON request body
#[derive(Debug, Clone)]
pub struct EncodedMedia {
    pub kind: MediaKind,
    /// Wire format name, e.g. "jpeg" or "mp4"
    pub format: String,
    /// Base64 payload
    pub data: String,
}

fn to_jpeg(image: &DynamicImage) -> Result<Vec<u8>, FlavorError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(FlavorError::NoMedia);
    }
    // JPEG has no alpha channel
    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
    let mut buf = Cursor::new(Vec::new());
    rgb.write_to(&mut buf, ImageFormat::Jpeg)?;
    Ok(buf.into_inner())
}
