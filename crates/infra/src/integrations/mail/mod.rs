//! Mail-calendar source adapter

mod adapter;
mod token;

pub use adapter::MailCalendarAdapter;
pub use token::{AccessTokenProvider, StaticTokenProvider};
