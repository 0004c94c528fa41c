//! Geominder - IP geolocation lookup service
//!
//! Resolves IPv4/IPv6 addresses to country code, coordinates and accuracy
//! radius using a MaxMind City database, and serves the result as JSON over
//! HTTP with an in-memory response cache in front of the database.
//!
//! # Architecture
//! - `services`: Database reader and two-phase lookup (locate, then decode)
//! - `cache`: Byte-bounded, TTL-expiring response cache with runtime toggle
//! - `api`: HTTP endpoint (any method, any path)
//! - `config`: Configuration management (TOML + environment)
//! - `cli`: Command-line flags and subcommands
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: Logging setup

pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod system;
