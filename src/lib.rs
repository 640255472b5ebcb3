//! Caching, coalescing data-access layer over the WordPress REST API.
//!
//! The entry point is [`wordpress::ApiClient`]: build one from
//! [`config::Settings`], share clones of it, and call its read operations
//! with a [`wordpress::CachePolicy`].

pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
pub mod wordpress;
