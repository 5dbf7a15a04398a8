//! User directory client library
//!
//! A cached client for paginated user-listing REST APIs. This module exposes
//! the client, cache and configuration for the demo binary and integration tests.

pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
