//! Telemetry Trends - analytics API over curated temperature & humidity readings
//!
//! This library exposes the core modules for testing and reuse.

pub mod common;
pub mod config;
pub mod entity;
pub mod error;
pub mod export;
pub mod routes;
pub mod store;
pub mod trends;
