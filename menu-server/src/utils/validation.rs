//! Input validation limits
//!
//! SQLite TEXT has no built-in length enforcement, so every text field
//! accepted from clients is capped here.

/// Menu names and types
pub const MAX_NAME_LEN: usize = 200;

/// Descriptions
pub const MAX_NOTE_LEN: usize = 500;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;
