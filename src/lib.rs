// ABOUTME: Library root for deploylog - resolves and streams deployment logs.
// ABOUTME: The CLI binary is in main.rs.

pub mod config;
pub mod error;
pub mod logs;
pub mod model;
pub mod store;
pub mod types;
