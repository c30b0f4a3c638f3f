//! Shared command utilities

pub mod logging;
