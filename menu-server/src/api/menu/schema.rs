//! Menu payload schema
//!
//! 请求体先被收集为 JSON 字段表 ([`MenuPayload`])，再按固定顺序逐字段校验。
//! multipart / urlencoded 请求中所有值都是字符串，数值字段因此接受十进制字符串。
//! 第一个失败的字段决定错误信息，格式如 `"name" is required`。

use serde_json::{Map, Value};
use shared::models::{MenuCreate, MenuUpdate};
use shared::{AppError, AppResult};
use validator::ValidateUrl;

use crate::utils::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, MAX_URL_LEN};

/// Field keys in validation order
pub const MENU_FIELDS: [&str; 7] = [
    "name",
    "categoryID",
    "description",
    "type",
    "image",
    "price",
    "qty",
];

/// Largest integer a JSON number can carry without losing precision
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Raw, unvalidated menu fields as submitted by the client
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuPayload(Map<String, Value>);

impl MenuPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// 数量由服务端决定，客户端提交的值一律覆盖为 1
    pub fn force_qty(&mut self) {
        self.insert("qty", 1);
    }

    fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }
}

impl From<Map<String, Value>> for MenuPayload {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// How the `image` field is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRule {
    /// Must be present and a valid URI
    Required,
    /// May be absent or empty; otherwise a valid URI
    Optional,
}

/// Menu validation schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuSchema {
    pub image: ImageRule,
}

/// Validated menu fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuInput {
    pub name: String,
    pub category_id: i64,
    /// None when omitted
    pub description: Option<String>,
    pub menu_type: String,
    /// None when omitted or sent empty
    pub image: Option<String>,
    pub price: i64,
    pub qty: i64,
}

impl MenuSchema {
    /// Schema for creating a menu: an image is mandatory
    pub const CREATE: Self = Self {
        image: ImageRule::Required,
    };

    /// Schema for updating a menu: the image may be left out
    pub const UPDATE: Self = Self {
        image: ImageRule::Optional,
    };

    pub fn validate(&self, payload: &MenuPayload) -> AppResult<MenuInput> {
        let name = required_text(payload, "name", MAX_NAME_LEN)?;
        let category_id = required_integer(payload, "categoryID", None)?;
        let description = optional_text(payload, "description", MAX_NOTE_LEN)?;
        let menu_type = required_text(payload, "type", MAX_NAME_LEN)?;
        let image = match self.image {
            ImageRule::Required => Some(required_uri(payload, "image")?),
            ImageRule::Optional => optional_uri(payload, "image")?,
        };
        let price = required_integer(payload, "price", Some(0))?;
        let qty = required_integer(payload, "qty", Some(0))?;

        if let Some(key) = payload.keys().find(|k| !MENU_FIELDS.contains(&k.as_str())) {
            return Err(AppError::invalid_field(key, format!("\"{key}\" is not allowed")));
        }

        Ok(MenuInput {
            name,
            category_id,
            description,
            menu_type,
            image,
            price,
            qty,
        })
    }
}

impl MenuInput {
    /// The image is always set by [`MenuSchema::CREATE`]
    pub fn into_create(self) -> MenuCreate {
        MenuCreate {
            name: self.name,
            category_id: self.category_id,
            description: self.description.unwrap_or_default(),
            menu_type: self.menu_type,
            image: self.image.unwrap_or_default(),
            price: self.price,
            qty: self.qty,
        }
    }

    pub fn into_update(self) -> MenuUpdate {
        MenuUpdate {
            name: self.name,
            category_id: self.category_id,
            description: self.description,
            menu_type: self.menu_type,
            image: self.image,
            price: self.price,
            qty: self.qty,
        }
    }
}

// ── Field rules ─────────────────────────────────────────────────────

fn required(payload: &MenuPayload, field: &str) -> AppResult<Value> {
    payload
        .get(field)
        .cloned()
        .ok_or_else(|| AppError::invalid_field(field, format!("\"{field}\" is required")))
}

fn as_text(value: Value, field: &str, max_len: usize) -> AppResult<String> {
    let Value::String(text) = value else {
        return Err(AppError::invalid_field(field, format!("\"{field}\" must be a string")));
    };
    if text.chars().count() > max_len {
        return Err(AppError::invalid_field(
            field,
            format!("\"{field}\" length must be less than or equal to {max_len} characters long"),
        ));
    }
    Ok(text)
}

fn required_text(payload: &MenuPayload, field: &str, max_len: usize) -> AppResult<String> {
    let text = as_text(required(payload, field)?, field, max_len)?;
    if text.is_empty() {
        return Err(AppError::invalid_field(
            field,
            format!("\"{field}\" is not allowed to be empty"),
        ));
    }
    Ok(text)
}

/// Empty string allowed
fn optional_text(payload: &MenuPayload, field: &str, max_len: usize) -> AppResult<Option<String>> {
    payload
        .get(field)
        .cloned()
        .map(|v| as_text(v, field, max_len))
        .transpose()
}

fn check_uri(text: String, field: &str) -> AppResult<String> {
    if !text.as_str().validate_url() {
        return Err(AppError::invalid_field(field, format!("\"{field}\" must be a valid uri")));
    }
    Ok(text)
}

fn required_uri(payload: &MenuPayload, field: &str) -> AppResult<String> {
    check_uri(required_text(payload, field, MAX_URL_LEN)?, field)
}

fn optional_uri(payload: &MenuPayload, field: &str) -> AppResult<Option<String>> {
    match optional_text(payload, field, MAX_URL_LEN)? {
        Some(text) if !text.is_empty() => check_uri(text, field).map(Some),
        _ => Ok(None),
    }
}

fn required_integer(payload: &MenuPayload, field: &str, min: Option<i64>) -> AppResult<i64> {
    let number = match required(payload, field)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
    .ok_or_else(|| AppError::invalid_field(field, format!("\"{field}\" must be a number")))?;

    if number.fract() != 0.0 {
        return Err(AppError::invalid_field(field, format!("\"{field}\" must be an integer")));
    }
    if number.abs() > MAX_SAFE_INTEGER {
        return Err(AppError::invalid_field(field, format!("\"{field}\" must be a safe number")));
    }

    let value = number as i64;
    if let Some(min) = min
        && value < min
    {
        return Err(AppError::invalid_field(
            field,
            format!("\"{field}\" must be greater than or equal to {min}"),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> MenuPayload {
        match value {
            Value::Object(map) => map.into(),
            _ => panic!("payload must be an object"),
        }
    }

    fn latte() -> Value {
        json!({
            "name": "Latte",
            "categoryID": 1,
            "type": "drink",
            "price": 4,
            "qty": 1,
            "image": "http://localhost:3000/uploads/latte.png"
        })
    }

    fn message(schema: MenuSchema, value: Value) -> String {
        schema.validate(&payload(value)).unwrap_err().message
    }

    #[test]
    fn test_valid_create() {
        let input = MenuSchema::CREATE.validate(&payload(latte())).unwrap();
        assert_eq!(input.name, "Latte");
        assert_eq!(input.category_id, 1);
        assert_eq!(input.description, None);
        assert_eq!(input.image.as_deref(), Some("http://localhost:3000/uploads/latte.png"));

        let create = input.into_create();
        assert_eq!(create.description, "");
        assert_eq!(create.price, 4);
    }

    #[test]
    fn test_create_requires_image() {
        let mut value = latte();
        value.as_object_mut().unwrap().remove("image");
        assert_eq!(message(MenuSchema::CREATE, value), "\"image\" is required");
    }

    #[test]
    fn test_missing_field_is_named() {
        for field in ["name", "categoryID", "type", "price", "qty"] {
            let mut value = latte();
            value.as_object_mut().unwrap().remove(field);
            let err = MenuSchema::UPDATE.validate(&payload(value)).unwrap_err();
            assert_eq!(err.message, format!("\"{field}\" is required"));
            assert_eq!(err.details.unwrap().get("field").unwrap(), field);
        }
    }

    #[test]
    fn test_first_failure_wins() {
        let value = json!({ "price": "abc" });
        assert_eq!(message(MenuSchema::CREATE, value), "\"name\" is required");
    }

    #[test]
    fn test_form_strings_are_converted() {
        let value = json!({
            "name": "Latte",
            "categoryID": "1",
            "type": "drink",
            "price": " 4 ",
            "qty": "1",
            "description": "",
            "image": ""
        });
        let input = MenuSchema::UPDATE.validate(&payload(value)).unwrap();
        assert_eq!(input.category_id, 1);
        assert_eq!(input.price, 4);
        assert_eq!(input.description.as_deref(), Some(""));
        assert_eq!(input.image, None);
    }

    #[test]
    fn test_number_rules() {
        let mut value = latte();
        value["price"] = json!("four");
        assert_eq!(message(MenuSchema::CREATE, value), "\"price\" must be a number");

        let mut value = latte();
        value["price"] = json!(4.5);
        assert_eq!(message(MenuSchema::CREATE, value), "\"price\" must be an integer");

        let mut value = latte();
        value["price"] = json!(-1);
        assert_eq!(
            message(MenuSchema::CREATE, value),
            "\"price\" must be greater than or equal to 0"
        );

        let mut value = latte();
        value["categoryID"] = json!("");
        assert_eq!(message(MenuSchema::CREATE, value), "\"categoryID\" must be a number");

        let mut value = latte();
        value["price"] = json!("4.0");
        assert_eq!(MenuSchema::CREATE.validate(&payload(value)).unwrap().price, 4);
    }

    #[test]
    fn test_text_rules() {
        let mut value = latte();
        value["name"] = json!("");
        assert_eq!(message(MenuSchema::CREATE, value), "\"name\" is not allowed to be empty");

        let mut value = latte();
        value["type"] = json!(5);
        assert_eq!(message(MenuSchema::CREATE, value), "\"type\" must be a string");

        let mut value = latte();
        value["name"] = json!("x".repeat(MAX_NAME_LEN + 1));
        assert_eq!(
            message(MenuSchema::CREATE, value),
            "\"name\" length must be less than or equal to 200 characters long"
        );
    }

    #[test]
    fn test_image_rules() {
        let mut value = latte();
        value["image"] = json!("not a uri");
        assert_eq!(message(MenuSchema::CREATE, value), "\"image\" must be a valid uri");

        let mut value = latte();
        value["image"] = json!("");
        assert_eq!(message(MenuSchema::CREATE, value), "\"image\" is not allowed to be empty");

        let mut value = latte();
        value["image"] = json!("not a uri");
        assert_eq!(message(MenuSchema::UPDATE, value), "\"image\" must be a valid uri");

        let mut value = latte();
        value.as_object_mut().unwrap().remove("image");
        let update = MenuSchema::UPDATE.validate(&payload(value)).unwrap().into_update();
        assert_eq!(update.image, None);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let mut value = latte();
        value["id"] = json!(9);
        assert_eq!(message(MenuSchema::CREATE, value), "\"id\" is not allowed");
    }

    #[test]
    fn test_force_qty_overrides_client_value() {
        let mut value = latte();
        value["qty"] = json!(5);
        let mut payload = payload(value);
        payload.force_qty();
        assert_eq!(MenuSchema::CREATE.validate(&payload).unwrap().qty, 1);
    }
}
