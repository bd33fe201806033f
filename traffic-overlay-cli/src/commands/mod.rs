//! CLI command implementations.

pub mod common;
pub mod input;
pub mod output;
pub mod overlay;
pub mod watch;
