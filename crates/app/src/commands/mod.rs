//! Operator and display-layer command surface

pub mod events;
pub mod sync;
