// ABOUTME: Library root for liftoff - a thin wrapper around the Heroku platform API.
// ABOUTME: The CLI binary is in main.rs.

pub mod api;
pub mod config;
pub mod credentials;
pub mod error;
pub mod extract;
pub mod rendezvous;
pub mod tls;
pub mod types;
pub mod wrapper;

pub use wrapper::{HerokuWrapper, MIGRATION_COMMAND, WrapperError, WrapperOptions};
