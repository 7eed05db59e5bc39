//! Kotodo server: per-user todo lists over a small SQL query layer

mod app;
pub mod api;
pub mod core;
pub mod data;
pub mod domain;
pub mod utils;
