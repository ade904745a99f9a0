//! Validated multipart extractor for registration forms.
//!
//! Text parts are collected by name and deserialized into `T` the same way
//! a JSON body would be, then validated. The `profileImage` part, when
//! present and non-empty, is kept aside as an [`UploadedImage`].

use axum::{
    async_trait,
    extract::{multipart::Field, FromRequest, Multipart, Request},
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use validator::Validate;

use super::format_validation_errors;
use crate::config::{MAX_UPLOAD_BYTES, PROFILE_IMAGE_FIELD};
use crate::errors::AppError;
use crate::infra::UploadedImage;

/// Multipart form with validated text fields and an optional image.
pub struct ValidatedMultipart<T> {
    pub fields: T,
    pub image: Option<UploadedImage>,
}

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedMultipart<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::bad_request(e.body_text()))?;

        let mut text_fields = Map::new();
        let mut image = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::bad_request(e.body_text()))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if name == PROFILE_IMAGE_FIELD {
                image = read_image(field).await?;
            } else {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::bad_request(e.body_text()))?;
                text_fields.insert(name, Value::String(text));
            }
        }

        let fields: T = serde_json::from_value(Value::Object(text_fields))
            .map_err(|e| AppError::validation(e.to_string()))?;

        fields
            .validate()
            .map_err(|e| AppError::validation(format_validation_errors(&e)))?;

        Ok(ValidatedMultipart { fields, image })
    }
}

/// Read the image part. An empty part (no file chosen) counts as absent.
async fn read_image(field: Field<'_>) -> Result<Option<UploadedImage>, AppError> {
    let file_name = field.file_name().map(str::to_string);
    let content_type = field.content_type().map(str::to_string);

    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::bad_request(e.body_text()))?;

    if bytes.is_empty() {
        return Ok(None);
    }

    let content_type = content_type
        .filter(|ct| ct.starts_with("image/"))
        .ok_or_else(|| AppError::validation("Profile image must be an image file"))?;

    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(AppError::validation(format!(
            "Profile image must be at most {} MB",
            MAX_UPLOAD_BYTES / (1024 * 1024)
        )));
    }

    Ok(Some(UploadedImage {
        file_name,
        content_type,
        bytes: bytes.to_vec(),
    }))
}
