use sqlx::SqlitePool;

use crate::core::{Config, Result};
use crate::db::DbService;
use crate::services::ImageStorage;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 所有字段都可以廉价 clone，axum 每个请求拿到一份副本。
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// SQLite 连接池
    pub pool: SqlitePool,
    /// 上传图片存储
    pub images: ImageStorage,
}

impl ServerState {
    pub fn new(config: Config, pool: SqlitePool, images: ImageStorage) -> Self {
        Self {
            config,
            pool,
            images,
        }
    }

    /// 初始化服务器状态
    ///
    /// 1. 创建上传目录
    /// 2. 打开数据库并执行迁移
    pub async fn initialize(config: &Config) -> Result<Self> {
        let images = ImageStorage::new(
            config.uploads_dir(),
            config.public_base_url.clone(),
            config.max_upload_bytes,
        );
        images.ensure_dir().await?;

        let db = DbService::new(&config.database_path()).await?;

        tracing::info!(
            work_dir = %config.work_dir,
            uploads = %images.uploads_dir().display(),
            "Server state initialized"
        );

        Ok(Self::new(config.clone(), db.pool, images))
    }
}
