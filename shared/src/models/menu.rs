//! Menu Model

use serde::{Deserialize, Serialize};

/// Menu entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    pub id: i64,
    pub name: String,
    #[serde(rename = "categoryID")]
    pub category_id: i64,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    #[cfg_attr(feature = "db", sqlx(rename = "type"))]
    pub menu_type: String,
    /// Public URL of the menu image
    pub image: String,
    pub price: i64,
    pub qty: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create menu payload (already validated)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuCreate {
    pub name: String,
    #[serde(rename = "categoryID")]
    pub category_id: i64,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub menu_type: String,
    pub image: String,
    pub price: i64,
    pub qty: i64,
}

/// Update menu payload (already validated)
///
/// `description` and `image` are left untouched when `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuUpdate {
    pub name: String,
    #[serde(rename = "categoryID")]
    pub category_id: i64,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub menu_type: String,
    pub image: Option<String>,
    pub price: i64,
    pub qty: i64,
}
