//! CLI command implementations

pub mod cards;
pub mod init;
pub mod progress;
