//! Image Storage Service
//!
//! 负责上传图片的校验、落盘、URL 映射和清理。
//!
//! 上传文件在请求体解析阶段就写入磁盘，此时菜单记录还不存在。
//! [`UploadedImage`] 持有该文件：只有调用 [`UploadedImage::persist`]
//! 之后文件才会保留，否则在 drop 时删除。

use std::path::{Path, PathBuf};

use image::ImageFormat;
use shared::{AppError, AppResult, ErrorCode};
use tokio::fs;
use uuid::Uuid;

/// Supported image formats
pub const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif"];

/// URL path segment under which uploads are served
pub const UPLOADS_ROUTE: &str = "uploads";

/// 图片存储服务
#[derive(Clone, Debug)]
pub struct ImageStorage {
    /// 上传目录: {work_dir}/uploads
    uploads_dir: PathBuf,
    /// URL 前缀，不带末尾斜杠
    public_base_url: String,
    max_file_size: usize,
}

impl ImageStorage {
    pub fn new(uploads_dir: PathBuf, public_base_url: impl Into<String>, max_file_size: usize) -> Self {
        Self {
            uploads_dir,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
            max_file_size,
        }
    }

    /// 确保上传目录存在
    pub async fn ensure_dir(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.uploads_dir).await
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    /// Public URL of a stored file: `{base}/uploads/{filename}`
    pub fn public_url(&self, filename: &str) -> String {
        format!("{}/{}/{}", self.public_base_url, UPLOADS_ROUTE, filename)
    }

    /// Validate the bytes and write them under a fresh name
    ///
    /// The returned guard removes the file again unless it is persisted.
    pub async fn store(&self, original_name: &str, data: &[u8]) -> AppResult<UploadedImage> {
        if original_name.is_empty() {
            return Err(AppError::new(ErrorCode::NoFilename));
        }
        let ext = file_extension(original_name)?;
        validate_image(data, &ext, self.max_file_size)?;

        let filename = format!("{}.{}", Uuid::new_v4(), ext);
        let path = self.uploads_dir.join(&filename);

        // guard 先于写入创建，写入失败留下的残片同样会被清理
        let guard = UploadedImage {
            url: self.public_url(&filename),
            path,
            persisted: false,
        };

        fs::write(&guard.path, data)
            .await
            .map_err(|e| AppError::storage(format!("Failed to save file: {e}")))?;

        tracing::info!(
            original_name = %original_name,
            filename = %filename,
            size = data.len(),
            "Image uploaded"
        );

        Ok(guard)
    }

    /// Map a public URL back to a file in the uploads directory
    ///
    /// Returns `None` for URLs that do not point at a stored upload.
    pub fn local_path(&self, url: &str) -> Option<PathBuf> {
        let prefix = format!("{}/{}/", self.public_base_url, UPLOADS_ROUTE);
        let filename = url.strip_prefix(&prefix)?;
        if !is_safe_filename(filename) {
            return None;
        }
        Some(self.uploads_dir.join(filename))
    }

    /// 删除 URL 对应的上传文件
    ///
    /// 文件不存在或 URL 不属于本服务时返回 false，不视为错误
    pub async fn remove_by_url(&self, url: &str) -> bool {
        let Some(path) = self.local_path(url) else {
            tracing::debug!(url = %url, "Image URL is not a stored upload, skipping removal");
            return false;
        };

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), "Image removed");
                true
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to remove image");
                false
            }
        }
    }
}

/// An uploaded file that is not yet referenced by any menu
#[derive(Debug)]
#[must_use = "the file is deleted when the guard is dropped"]
pub struct UploadedImage {
    path: PathBuf,
    url: String,
    persisted: bool,
}

impl UploadedImage {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Keep the file on disk; call once the menu row referencing it is committed
    pub fn persist(mut self) {
        self.persisted = true;
    }
}

impl Drop for UploadedImage {
    fn drop(&mut self) {
        if self.persisted {
            return;
        }
        // 同步删除单个文件：guard 释放后文件即已不存在，响应发出前清理完成
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Discarded unused upload"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to discard upload")
            }
        }
    }
}

/// Reject anything that could escape the uploads directory
pub fn is_safe_filename(name: &str) -> bool {
    !name.is_empty()
        && !name.contains("..")
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains('\0')
}

fn file_extension(name: &str) -> AppResult<String> {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::UnsupportedFileFormat,
                format!("File '{}' has no extension. Supported: {}", name, SUPPORTED_FORMATS.join(", ")),
            )
        })
}

/// Validate image file
fn validate_image(data: &[u8], ext: &str, max_size: usize) -> AppResult<()> {
    if data.is_empty() {
        return Err(AppError::new(ErrorCode::EmptyFile));
    }

    if data.len() > max_size {
        return Err(AppError::with_message(
            ErrorCode::FileTooLarge,
            format!(
                "File too large. Maximum size is {} bytes ({}MB)",
                max_size,
                max_size / 1024 / 1024
            ),
        ));
    }

    if !SUPPORTED_FORMATS.contains(&ext) {
        return Err(AppError::with_message(
            ErrorCode::UnsupportedFileFormat,
            format!(
                "Unsupported file format '{}'. Supported: {}",
                ext,
                SUPPORTED_FORMATS.join(", ")
            ),
        ));
    }

    // 内容必须与扩展名一致
    let detected = image::guess_format(data).map_err(|e| {
        AppError::with_message(ErrorCode::InvalidImageFile, format!("Invalid image file ({ext}): {e}"))
    })?;
    if ImageFormat::from_extension(ext) != Some(detected) {
        return Err(AppError::with_message(
            ErrorCode::InvalidImageFile,
            format!("File content ({detected:?}) does not match extension '{ext}'"),
        ));
    }

    // Verify it's actually an image by trying to load it
    if let Err(e) = image::load_from_memory_with_format(data, detected) {
        return Err(AppError::with_message(
            ErrorCode::InvalidImageFile,
            format!("Invalid image file ({ext}): {e}"),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbImage::new(2, 2);
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    fn storage(dir: &Path) -> ImageStorage {
        ImageStorage::new(dir.to_path_buf(), "http://localhost:3000/", 1024 * 1024)
    }

    fn file_count(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[tokio::test]
    async fn test_dropped_upload_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(dir.path());

        let upload = storage.store("latte.PNG", &png_bytes()).await.unwrap();
        assert!(upload.path().exists());
        assert!(upload.url().starts_with("http://localhost:3000/uploads/"));
        assert!(upload.url().ends_with(".png"));

        let path = upload.path().to_path_buf();
        drop(upload);
        assert!(!path.exists());
        assert_eq!(file_count(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_persisted_upload_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(dir.path());

        let upload = storage.store("latte.png", &png_bytes()).await.unwrap();
        let url = upload.url().to_string();
        upload.persist();

        let path = storage.local_path(&url).unwrap();
        assert!(path.exists());

        assert!(storage.remove_by_url(&url).await);
        assert!(!path.exists());
        assert!(!storage.remove_by_url(&url).await);
    }

    #[tokio::test]
    async fn test_rejected_uploads_leave_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let storage = ImageStorage::new(dir.path().to_path_buf(), "http://localhost:3000", 64);

        let err = storage.store("menu.pdf", b"%PDF-1.4").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedFileFormat);

        let err = storage.store("big.png", &png_bytes().repeat(10)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::FileTooLarge);

        let err = storage.store("empty.png", &[]).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyFile);

        let err = storage.store("noext", b"abc").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedFileFormat);

        assert_eq!(file_count(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_content_must_match_extension() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(dir.path());

        let err = storage.store("photo.jpg", &png_bytes()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidImageFile);

        let err = storage
            .store("fake.png", b"definitely not an image")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidImageFile);
    }

    #[test]
    fn test_local_path_only_for_own_uploads() {
        let storage = storage(Path::new("/srv/uploads"));

        assert_eq!(
            storage.local_path("http://localhost:3000/uploads/a.png"),
            Some(PathBuf::from("/srv/uploads/a.png"))
        );
        assert_eq!(storage.local_path("https://cdn.example.com/uploads/a.png"), None);
        assert_eq!(storage.local_path("http://localhost:3000/uploads/../secret"), None);
        assert_eq!(storage.local_path("http://localhost:3000/uploads/"), None);
        assert_eq!(storage.local_path(""), None);
    }

    #[test]
    fn test_is_safe_filename() {
        assert!(is_safe_filename("0b9e.png"));
        assert!(!is_safe_filename(""));
        assert!(!is_safe_filename("../etc/passwd"));
        assert!(!is_safe_filename("a/b.png"));
        assert!(!is_safe_filename("a\\b.png"));
    }
}
