//! Storefront CLI - interactive client for the storefront API.
//!
//! A small blocking client: one request in flight at a time, blocking on
//! user input between calls. No retries or timeouts; a connection failure
//! is reported once and the menu continues.

#![forbid(unsafe_code)]

pub mod api;
pub mod ui;
