//! CLI command implementations

pub mod clean;
pub mod draft;
pub mod generate;
pub mod init;
pub mod list;
pub mod publish;
pub mod render;
pub mod show;
