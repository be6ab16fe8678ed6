// ABOUTME: Validated domain types shared across the crate.
// ABOUTME: Currently the application name used in every API path.

mod app_name;

pub use app_name::{AppName, AppNameError};
