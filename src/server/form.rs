use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::warn;

use super::ErrorResponse;
use crate::media::{Media, MediaKind, VideoFormat};
use crate::FlavorError;

/// A file field exactly as the browser sent it
#[derive(Debug)]
pub struct Upload {
    pub kind: MediaKind,
    pub file_name: Option<String>,
    pub data: Vec<u8>,
}

impl Upload {
    /// Decode into media. Image bytes are decoded here, video bytes are kept as-is.
    pub fn into_media(self) -> Result<Media, FlavorError> {
        match self.kind {
            MediaKind::Image => Media::image_from_bytes(&self.data),
            MediaKind::Video => {
                let format = match self.file_name.as_deref() {
                    Some(name) => VideoFormat::from_path(name)?,
                    None => VideoFormat::default(),
                };
                Media::video(self.data, format)
            }
        }
    }
}

/// Fields of the analyze form
#[derive(Debug, Default)]
pub struct UploadForm {
    pub upload: Option<Upload>,
    pub preferences: Option<String>,
    /// Ingredients shown by a previous analysis, posted back to regenerate the recipe
    pub ingredients: Option<String>,
}

/// Request could not be read as the analyze form
#[derive(Debug)]
pub struct FormRejection {
    pub status: StatusCode,
    pub message: String,
}

impl FormRejection {
    fn bad_request(message: impl Into<String>) -> Self {
        FormRejection {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<MultipartError> for FormRejection {
    fn from(e: MultipartError) -> Self {
        warn!("Multipart read error: {}", e);
        let status = e.status();
        let message = if status == StatusCode::PAYLOAD_TOO_LARGE {
            "File too large".to_string()
        } else {
            format!("Failed to read multipart data: {}", e.body_text())
        };
        FormRejection { status, message }
    }
}

impl IntoResponse for FormRejection {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl UploadForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, FormRejection> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "image" | "video" => {
                    let kind = if name == "image" {
                        MediaKind::Image
                    } else {
                        MediaKind::Video
                    };
                    let file_name = field.file_name().map(str::to_string);
                    let data = field.bytes().await?;

                    // Browsers submit an empty part for an untouched file input
                    if data.is_empty() {
                        continue;
                    }
                    if form.upload.is_some() {
                        return Err(FormRejection::bad_request(
                            "Provide either an image or a video, not both",
                        ));
                    }
                    form.upload = Some(Upload {
                        kind,
                        file_name,
                        data: data.to_vec(),
                    });
                }
                "preferences" => form.preferences = non_blank(field.text().await?),
                "ingredients" => form.ingredients = non_blank(field.text().await?),
                other => warn!("Ignoring unknown form field '{}'", other),
            }
        }

        Ok(form)
    }
}

fn non_blank(text: String) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank("  ".to_string()), None);
        assert_eq!(non_blank("spicy".to_string()), Some("spicy".to_string()));
    }

    #[test]
    fn test_video_upload_uses_file_extension() {
        let upload = Upload {
            kind: MediaKind::Video,
            file_name: Some("pantry.MOV".to_string()),
            data: vec![1, 2, 3],
        };
        match upload.into_media().unwrap() {
            Media::Video { format, data } => {
                assert_eq!(format, VideoFormat::Mov);
                assert_eq!(data, vec![1, 2, 3]);
            }
            other => panic!("expected video, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_image_upload_must_decode() {
        let upload = Upload {
            kind: MediaKind::Image,
            file_name: Some("fridge.jpg".to_string()),
            data: b"not really a jpeg".to_vec(),
        };
        assert!(matches!(
            upload.into_media(),
            Err(FlavorError::ImageDecode(_))
        ));
    }
}
