//! Query construction for wmcs-edits.
//!
//! Holds the parameters of the per-wiki edit count query and renders them
//! into the HiveQL text handed to the engine.

pub mod builder;

pub use builder::{QueryParams, DEFAULT_LIMIT, DEFAULT_MONTH, DEFAULT_ORIGIN, DEFAULT_TABLE};
