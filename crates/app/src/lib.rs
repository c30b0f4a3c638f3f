//! # PlanDesk App
//!
//! Host process wiring: configuration, dependency construction and the
//! operator-facing command surface on top of `plandesk-core` services.

pub mod commands;
pub mod context;
pub mod utils;

pub use context::AppContext;
