//! YieldShift Core Library
//!
//! Shared types, reference data and errors for the YieldShift migration
//! scoring service.

pub mod error;
pub mod protocols;
pub mod types;

pub use error::{Error, Result};
