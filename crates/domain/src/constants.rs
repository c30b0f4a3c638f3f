//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

/// Title substrings that mark an ERP absence/holiday entry.
///
/// The upstream ERP exposes no type tag; holiday rows are recognized by a
/// case-insensitive substring match against the event title. The single
/// entry mirrors the upstream vocabulary ("dovolená" and its inflections).
/// A patch entry whose title happens to contain a keyword is misclassified
/// as a holiday; the match is kept as-is for upstream compatibility.
pub const ABSENCE_TITLE_KEYWORDS: &[&str] = &["dovolen"];

// Source adapter configuration
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAIL_LOOKBACK_HOURS: u32 = 24 * 30;
pub const DEFAULT_MAIL_LOOKAHEAD_HOURS: u32 = 24 * 60;

// Database configuration
pub const DEFAULT_DB_POOL_SIZE: u32 = 4;
