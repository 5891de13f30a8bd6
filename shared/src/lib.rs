//! Shared types for the POS engine
//!
//! Data models, error codes and small utilities used by every crate in the
//! workspace.

pub mod error;
pub mod models;
pub mod types;
pub mod util;

// Re-exports
pub use error::{AppError, AppResult, ErrorCode};
pub use serde::{Deserialize, Serialize};
