//! CLI command implementations

pub mod config;
pub mod feed;
pub mod search;
pub mod session;
pub mod user;
