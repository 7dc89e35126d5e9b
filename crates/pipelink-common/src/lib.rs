//! Shared helpers for the pipelink workspace: logging setup and
//! platform defaults.

pub mod logging;
pub mod platform;
