//! Menu API 模块
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /menu | GET | 全部菜单 |
//! | /menu | POST | 创建菜单 (multipart, 可选 `image` 文件) |
//! | /menu/{id} | GET | 单个菜单 |
//! | /menu/{id} | PUT / PATCH | 更新菜单 |
//! | /menu/{id} | DELETE | 删除菜单 (无购买记录时) |

mod handler;
pub mod schema;
pub mod submission;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/menu", menu_routes())
}

fn menu_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .patch(handler::update)
                .delete(handler::delete),
        )
}
