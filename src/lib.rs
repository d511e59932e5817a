//! wmcs-edits - per-wiki Cloud VPS edit counts from the Hive warehouse.
//!
//! This library exposes the core modules for use in integration tests.

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod logging;
pub mod query;
pub mod runner;
