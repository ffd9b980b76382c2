//! Menu API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use super::schema::MenuSchema;
use super::submission::MenuSubmission;
use crate::core::ServerState;
use crate::db::repository::{RepoError, menu, purchase};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};
use shared::models::Menu;

fn parse_id(raw: &str) -> AppResult<i64> {
    raw.parse::<i64>()
        .map_err(|_| AppError::invalid_field("id", format!("Invalid menu id '{raw}'")))
}

fn name_taken(name: &str) -> AppError {
    AppError::with_message(
        ErrorCode::MenuNameExists,
        format!("Menu with name {name} already exist..."),
    )
    .with_detail("field", "name")
}

/// 写库失败 → 客户端可理解的错误
fn write_error(err: RepoError, name: &str, category_id: i64) -> AppError {
    match err {
        RepoError::Duplicate(_) => name_taken(name),
        RepoError::ForeignKey(_) => AppError::with_message(
            ErrorCode::CategoryNotFound,
            format!("Category {category_id} not found"),
        )
        .with_detail("field", "categoryID"),
        RepoError::NotFound(msg) => AppError::with_message(ErrorCode::MenuNotFound, msg),
        other => other.into(),
    }
}

// =============================================================================
// Menu Handlers
// =============================================================================

/// GET /menu - 获取所有菜单
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<Vec<Menu>>>> {
    let menus = menu::find_all(&state.pool).await?;
    Ok(Json(ApiResponse::success(menus)))
}

/// GET /menu/:id - 获取单个菜单
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Menu>>> {
    let id = parse_id(&id)?;
    let found = menu::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::MenuNotFound))?;
    Ok(Json(ApiResponse::success(found)))
}

/// POST /menu - 创建菜单
///
/// 上传的图片 URL 在校验前写入 `image` 字段；任何失败都会通过
/// `UploadedImage` 的 drop 删除已上传的文件。
pub async fn create(
    State(state): State<ServerState>,
    submission: MenuSubmission,
) -> AppResult<(StatusCode, Json<ApiResponse<Menu>>)> {
    let MenuSubmission { mut payload, image } = submission;

    payload.force_qty();
    if let Some(upload) = &image {
        payload.insert("image", upload.url());
    }

    let data = MenuSchema::CREATE.validate(&payload)?.into_create();

    if menu::find_by_name(&state.pool, &data.name).await?.is_some() {
        return Err(name_taken(&data.name));
    }

    let created = menu::create(&state.pool, &data)
        .await
        .map_err(|e| write_error(e, &data.name, data.category_id))?;

    if let Some(upload) = image {
        upload.persist();
    }

    tracing::info!(menu_id = created.id, name = %created.name, "Menu created");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message("Menu Created...", created)),
    ))
}

/// PUT /menu/:id - 更新菜单
///
/// 没有上传新图片且 `image` 缺省或为空时保留原图
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    submission: MenuSubmission,
) -> AppResult<Json<ApiResponse<Menu>>> {
    let MenuSubmission { mut payload, image } = submission;
    let id = parse_id(&id)?;

    payload.force_qty();
    let mut data = MenuSchema::UPDATE.validate(&payload)?.into_update();

    let existing = menu::find_by_id(&state.pool, id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::MenuNotFound, format!("Menu with ID {id} not found."))
    })?;

    if let Some(upload) = &image {
        data.image = Some(upload.url().to_string());
    }

    let updated = menu::update(&state.pool, id, &data)
        .await
        .map_err(|e| write_error(e, &data.name, data.category_id))?;

    // 新图已落库，旧图可以删除
    if let Some(upload) = image {
        upload.persist();
        if !existing.image.is_empty() && existing.image != updated.image {
            state.images.remove_by_url(&existing.image).await;
        }
    }

    tracing::info!(menu_id = id, "Menu updated");
    Ok(Json(ApiResponse::success_with_message(
        "Menu updated successfully.",
        updated,
    )))
}

/// DELETE /menu/:id - 删除菜单
///
/// 有购买记录的菜单不可删除；记录和图片都保持原样
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    let id = parse_id(&id)?;
    let existing = menu::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::with_message(ErrorCode::MenuNotFound, "Menu Not Found"))?;

    if purchase::exists_for_menu(&state.pool, id).await? {
        return Err(AppError::new(ErrorCode::MenuHasPurchases).with_detail("menu_id", id));
    }

    let deleted = menu::delete(&state.pool, id).await.map_err(|e| match e {
        // 检查之后才插入的购买记录
        RepoError::ForeignKey(_) => {
            AppError::new(ErrorCode::MenuHasPurchases).with_detail("menu_id", id)
        }
        other => other.into(),
    })?;
    if !deleted {
        return Err(AppError::with_message(ErrorCode::MenuNotFound, "Menu Not Found"));
    }

    if !existing.image.is_empty() {
        state.images.remove_by_url(&existing.image).await;
    }

    tracing::info!(menu_id = id, name = %existing.name, "Menu deleted");
    Ok(Json(ApiResponse::message("Menu have been deleted")))
}
