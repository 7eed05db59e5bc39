//! Utility functions for the application

pub mod crypto;
pub mod file;
pub mod password;
pub mod sql;
