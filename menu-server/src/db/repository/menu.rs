//! Menu Repository

use super::{RepoError, RepoResult};
use shared::models::{Menu, MenuCreate, MenuUpdate};
use sqlx::SqlitePool;

const MENU_SELECT: &str = "SELECT id, name, category_id, description, type, image, price, qty, created_at, updated_at FROM menu";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Menu>> {
    let sql = format!("{MENU_SELECT} ORDER BY id");
    let rows = sqlx::query_as::<_, Menu>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Menu>> {
    let sql = format!("{MENU_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Menu>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Exact, case-sensitive name lookup
pub async fn find_by_name(pool: &SqlitePool, name: &str) -> RepoResult<Option<Menu>> {
    let sql = format!("{MENU_SELECT} WHERE name = ? LIMIT 1");
    let row = sqlx::query_as::<_, Menu>(&sql)
        .bind(name)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: &MenuCreate) -> RepoResult<Menu> {
    let now = shared::util::now_millis();
    let result = sqlx::query(
        "INSERT INTO menu (name, category_id, description, type, image, price, qty, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
    )
    .bind(&data.name)
    .bind(data.category_id)
    .bind(&data.description)
    .bind(&data.menu_type)
    .bind(&data.image)
    .bind(data.price)
    .bind(data.qty)
    .bind(now)
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create menu".into()))
}

/// Replace the menu's fields; `None` description/image keep the stored value
pub async fn update(pool: &SqlitePool, id: i64, data: &MenuUpdate) -> RepoResult<Menu> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE menu SET name = ?1, category_id = ?2, description = COALESCE(?3, description), type = ?4, image = COALESCE(?5, image), price = ?6, qty = ?7, updated_at = ?8 WHERE id = ?9",
    )
    .bind(&data.name)
    .bind(data.category_id)
    .bind(data.description.as_deref())
    .bind(&data.menu_type)
    .bind(data.image.as_deref())
    .bind(data.price)
    .bind(data.qty)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Menu with ID {id} not found.")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Menu with ID {id} not found.")))
}

/// Returns `false` when no row had this id
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM menu WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        sqlx::query("INSERT INTO category (id, name, created_at) VALUES (1, 'Coffee', 0)")
            .execute(&pool)
            .await
            .unwrap();
        pool
    }

    fn latte() -> MenuCreate {
        MenuCreate {
            name: "Latte".into(),
            category_id: 1,
            description: "Milk coffee".into(),
            menu_type: "drink".into(),
            image: "http://localhost:3000/uploads/latte.png".into(),
            price: 4,
            qty: 1,
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let pool = test_pool().await;
        let created = create(&pool, &latte()).await.unwrap();
        assert_eq!(created.name, "Latte");
        assert_eq!(created.created_at, created.updated_at);

        let by_id = find_by_id(&pool, created.id).await.unwrap().unwrap();
        assert_eq!(by_id, created);

        let by_name = find_by_name(&pool, "Latte").await.unwrap().unwrap();
        assert_eq!(by_name.id, created.id);
        assert!(find_by_name(&pool, "latte").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_name_is_rejected() {
        let pool = test_pool().await;
        create(&pool, &latte()).await.unwrap();
        let err = create(&pool, &latte()).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
        assert_eq!(find_all(&pool).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_category_is_foreign_key_error() {
        let pool = test_pool().await;
        let mut data = latte();
        data.category_id = 99;
        let err = create(&pool, &data).await.unwrap_err();
        assert!(matches!(err, RepoError::ForeignKey(_)));
    }

    #[tokio::test]
    async fn test_update_keeps_image_when_none() {
        let pool = test_pool().await;
        let created = create(&pool, &latte()).await.unwrap();

        let updated = update(
            &pool,
            created.id,
            &MenuUpdate {
                name: "Flat White".into(),
                category_id: 1,
                description: None,
                menu_type: "drink".into(),
                image: None,
                price: 5,
                qty: 1,
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.name, "Flat White");
        assert_eq!(updated.price, 5);
        assert_eq!(updated.image, created.image);
        assert_eq!(updated.description, "Milk coffee");
    }

    #[tokio::test]
    async fn test_update_missing_row() {
        let pool = test_pool().await;
        let err = update(
            &pool,
            42,
            &MenuUpdate {
                name: "Mocha".into(),
                category_id: 1,
                description: None,
                menu_type: "drink".into(),
                image: None,
                price: 5,
                qty: 1,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete() {
        let pool = test_pool().await;
        let created = create(&pool, &latte()).await.unwrap();
        assert!(delete(&pool, created.id).await.unwrap());
        assert!(!delete(&pool, created.id).await.unwrap());
        assert!(find_by_id(&pool, created.id).await.unwrap().is_none());
    }
}
