//! Upload Routes
//!
//! 公开访问已上传的菜单图片: `GET /uploads/{filename}`

use axum::{
    Router,
    body::Bytes,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};

use crate::core::ServerState;
use crate::services::image_storage::{UPLOADS_ROUTE, is_safe_filename};

/// Upload file response
enum UploadFileResponse {
    Ok { content: Bytes, mime: String },
    NotFound,
    BadRequest(&'static str),
}

impl IntoResponse for UploadFileResponse {
    fn into_response(self) -> axum::response::Response {
        match self {
            UploadFileResponse::Ok { content, mime } => {
                (StatusCode::OK, [(header::CONTENT_TYPE, mime)], content).into_response()
            }
            UploadFileResponse::NotFound => (StatusCode::NOT_FOUND, "File not found").into_response(),
            UploadFileResponse::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
        }
    }
}

/// Serve uploaded file handler
async fn serve_uploaded_file(
    State(state): State<ServerState>,
    Path(filename): Path<String>,
) -> UploadFileResponse {
    // Security check: prevent path traversal
    if !is_safe_filename(&filename) {
        tracing::warn!(filename = %filename, "Rejected upload path");
        return UploadFileResponse::BadRequest("Invalid filename");
    }

    let file_path = state.images.uploads_dir().join(&filename);
    match tokio::fs::read(&file_path).await {
        Ok(content) => {
            let mime = mime_guess::from_path(&file_path)
                .first_or_octet_stream()
                .to_string();
            UploadFileResponse::Ok {
                content: content.into(),
                mime,
            }
        }
        Err(e) => {
            tracing::debug!(filename = %filename, error = %e, "Upload not found");
            UploadFileResponse::NotFound
        }
    }
}

/// Build upload router
pub fn router() -> Router<ServerState> {
    Router::new().route(
        &format!("/{UPLOADS_ROUTE}/{{filename}}"),
        get(serve_uploaded_file),
    )
}
