//! Taskbin Core — domain models, field validation, error taxonomy, and
//! repository trait contracts shared across all crates.

pub mod error;
pub mod models;
pub mod repository;
pub mod validate;

pub use error::{TaskbinError, TaskbinResult};
