//! Shared types for the menu service
//!
//! Domain models, error codes and the response envelope used by
//! `menu-server` and its clients.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use models::{Menu, MenuCreate, MenuUpdate};
