//! Ingest pipeline for synchronized events
//!
//! Raw upstream payloads pass through three pure stages before they reach
//! the store: fingerprinting (stable identity), classification (domain
//! kind) and normalization (canonical shape). All three are side-effect
//! free so they can be unit tested without any I/O.

pub mod classifier;
pub mod fingerprint;
pub mod normalizer;

pub use classifier::classify;
pub use fingerprint::fingerprint;
pub use normalizer::normalize;
