//! Upstream system integrations

pub mod erp;
pub mod mail;
