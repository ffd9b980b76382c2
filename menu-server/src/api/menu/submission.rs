//! Menu request body extractor
//!
//! 支持 multipart/form-data、JSON 和 urlencoded 三种请求体。
//! multipart 中的图片文件在解析阶段即写入上传目录，返回的
//! [`UploadedImage`] 在处理器确认落库之前都会在 drop 时删除该文件。

use std::collections::HashMap;

use axum::extract::multipart::MultipartError;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::{StatusCode, header};
use axum::{Form, Json};
use serde_json::{Map, Value};
use shared::{AppError, AppResult, ErrorCode};

use super::schema::MenuPayload;
use crate::core::ServerState;
use crate::services::{ImageStorage, UploadedImage};

/// The only multipart field that may carry a file
pub const IMAGE_FIELD: &str = "image";

/// Menu fields plus the optional uploaded image
#[derive(Debug)]
pub struct MenuSubmission {
    pub payload: MenuPayload,
    pub image: Option<UploadedImage>,
}

impl FromRequest<ServerState> for MenuSubmission {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &ServerState) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::invalid_request(e.body_text()))?;
            return read_multipart(multipart, &state.images).await;
        }

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|e| AppError::invalid_request(e.body_text()))?;
            let payload: Map<String, Value> = fields
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect();
            return Ok(Self {
                payload: payload.into(),
                image: None,
            });
        }

        let Json(payload) = Json::<Map<String, Value>>::from_request(req, state)
            .await
            .map_err(|e| AppError::invalid_request(e.body_text()))?;
        Ok(Self {
            payload: payload.into(),
            image: None,
        })
    }
}

fn file_too_large(max_size: usize) -> AppError {
    AppError::with_message(
        ErrorCode::FileTooLarge,
        format!("File too large. Maximum size is {max_size} bytes"),
    )
}

/// 请求体超过 body limit 时 multer 报 413，这里统一归为 FileTooLarge
fn multipart_error(err: MultipartError, context: &str, max_size: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return file_too_large(max_size);
    }
    AppError::invalid_request(format!("{context}: {err}"))
}

async fn read_multipart(mut multipart: Multipart, storage: &ImageStorage) -> AppResult<MenuSubmission> {
    let mut payload = MenuPayload::new();
    let mut image: Option<UploadedImage> = None;
    let max_size = storage.max_file_size();

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, "Invalid multipart request", max_size))?
    {
        let name = field.name().unwrap_or_default().to_string();

        let Some(file_name) = field.file_name().map(str::to_string) else {
            let text = field.text().await.map_err(|e| {
                multipart_error(e, &format!("Failed to read field '{name}'"), max_size)
            })?;
            payload.insert(name, text);
            continue;
        };

        // 浏览器在未选择文件时会提交空文件名
        if file_name.is_empty() {
            continue;
        }

        if name != IMAGE_FIELD || image.is_some() {
            return Err(AppError::with_message(
                ErrorCode::UnexpectedFileField,
                format!("Unexpected file field '{name}'"),
            ));
        }

        let mut data = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| multipart_error(e, "Failed to read file", max_size))?
        {
            if data.len() + chunk.len() > max_size {
                return Err(file_too_large(max_size));
            }
            data.extend_from_slice(&chunk);
        }

        image = Some(storage.store(&file_name, &data).await?);
    }

    Ok(MenuSubmission { payload, image })
}
