//! Purchase Repository
//!
//! 只读: 菜单删除前检查是否存在购买记录

use super::RepoResult;
use sqlx::SqlitePool;

/// Whether any purchase row references the given menu
pub async fn exists_for_menu(pool: &SqlitePool, menu_id: i64) -> RepoResult<bool> {
    let found: i64 = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM purchase WHERE menu_id = ?)")
        .bind(menu_id)
        .fetch_one(pool)
        .await?;
    Ok(found != 0)
}
