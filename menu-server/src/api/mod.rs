//! HTTP API 路由
//!
//! | 模块 | 前缀 |
//! |------|------|
//! | health | /health |
//! | menu | /menu |
//! | uploads | /uploads |

pub mod health;
pub mod menu;
pub mod uploads;

use std::any::Any;
use std::time::Duration;

use axum::{
    Router,
    extract::{DefaultBodyLimit, Request},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};
use tower_http::{
    catch_panic::CatchPanicLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};

use crate::core::ServerState;
use crate::utils::AppError;

/// Multipart framing on top of the image itself
const BODY_LIMIT_SLACK: usize = 1024 * 1024;

/// All routes, before state and layers are attached
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(menu::router())
        .merge(uploads::router())
}

/// Build the application with state and middleware
pub fn build_app(state: &ServerState) -> Router {
    let config = &state.config;

    build_router()
        .layer(DefaultBodyLimit::max(config.max_upload_bytes + BODY_LIMIT_SLACK))
        .layer(TimeoutLayer::new(Duration::from_millis(config.request_timeout_ms)))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn(log_request))
        .with_state(state.clone())
}

/// 处理器 panic 时返回统一的 500 响应，详情只进日志
fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    AppError::internal(format!("Handler panicked: {detail}")).into_response()
}

/// Access log: `METHOD URI STATUS`
async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let start = std::time::Instant::now();

    let response = next.run(req).await;

    let status = response.status();
    let latency_ms = start.elapsed().as_millis() as u64;
    if status.is_server_error() {
        tracing::warn!(target: "http_access", latency_ms, "{} {} {}", method, uri, status.as_u16());
    } else {
        tracing::info!(target: "http_access", latency_ms, "{} {} {}", method, uri, status.as_u16());
    }
    response
}
