//! HTTP networking module
//!
//! Provides the JSON client used for suggestion, explore and report requests.

mod client;

pub use client::{accept_json, ApiClient};
