//! HTTP route handlers

pub mod classify;
pub mod page;
