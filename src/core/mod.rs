//! Core types shared across the crate.
//!
//! Currently this is the error module: a single strongly-typed [`Error`] enum
//! covering every failure mode of resolution, adaptation, and rendering, plus
//! the crate-wide [`Result`] alias.

pub mod error;

pub use error::{Error, Result};
