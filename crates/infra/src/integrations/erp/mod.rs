//! ERP planning-calendar source adapter

mod adapter;

pub use adapter::ErpCalendarAdapter;
