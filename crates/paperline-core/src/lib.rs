//! Core paperline library (typewriter engine, résumé data, config).

pub mod config;
pub mod document;
pub mod export;
pub mod logging;
pub mod render;
pub mod segment;
pub mod sound;
pub mod source;
pub mod surface;
pub mod typewriter;
