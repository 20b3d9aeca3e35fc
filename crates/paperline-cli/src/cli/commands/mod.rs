//! CLI command handlers.

pub mod cache;
pub mod config;
pub mod export;
pub mod render;
pub mod show;
pub mod sound;
