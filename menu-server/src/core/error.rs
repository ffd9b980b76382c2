use shared::AppError;
use thiserror::Error;

/// 启动与运行期错误
///
/// 请求处理中的错误统一走 [`AppError`]，这里只覆盖服务器生命周期
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("初始化失败: {0}")]
    Init(#[from] AppError),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
