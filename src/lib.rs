//! Master League: fixed-odds betting administration service
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod book;
pub mod storage;
pub mod api;
