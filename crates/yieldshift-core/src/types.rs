//! Core domain types for the YieldShift scoring system.

pub mod opportunity;
pub mod position;
pub mod prediction;
pub mod score;

pub use opportunity::*;
pub use position::*;
pub use prediction::*;
pub use score::*;
