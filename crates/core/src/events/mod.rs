//! Event store port and the unified event service

pub mod ports;
pub mod service;

pub use service::EventService;
