//! CLI command implementations

pub mod clear;
pub mod config;
pub mod copy;
pub mod files;
pub mod locate;
pub mod newer;
pub mod watch;
