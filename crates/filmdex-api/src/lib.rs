//! API client library for filmdex.
//!
//! Provides a cached, retrying client for the OMDb movie database along
//! with the aggregation helpers built on top of it.

/// Bounded TTL cache for title details.
pub mod cache;

/// OMDb API client.
pub mod omdb;

/// Exponential backoff executor.
pub mod retry;
