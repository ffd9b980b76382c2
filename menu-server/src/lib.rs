//! Menu Server - 菜单资源服务
//!
//! # 模块结构
//!
//! ```text
//! menu-server/src/
//! ├── core/          # 配置、状态、服务器生命周期
//! ├── api/           # HTTP 路由和处理器
//! ├── services/      # 上传图片存储
//! ├── db/            # SQLite 连接池与仓储
//! └── utils/         # 日志、校验常量
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerError, ServerState};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::init_logger_with_file;

/// 设置运行环境: 加载 .env、创建工作目录、初始化日志
pub fn setup_environment(config: &Config) -> Result<(), ServerError> {
    std::fs::create_dir_all(&config.work_dir).map_err(|e| {
        ServerError::Config(format!("Cannot create work dir '{}': {e}", config.work_dir))
    })?;

    if let Some(dir) = &config.log_dir {
        std::fs::create_dir_all(dir)?;
    }

    init_logger_with_file(
        Some(&config.log_level),
        config.is_production(),
        config.log_dir.as_deref(),
    );
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    __  ___
   /  |/  /__  ____  __  __
  / /|_/ / _ \/ __ \/ / / /
 / /  / /  __/ / / / /_/ /
/_/  /_/\___/_/ /_/\__,_/
    "#
    );
}
