//! Utility modules for fuzzy inference
//!
//! Contains shared functionality used across the engine:
//! - Interpolation: piecewise-linear curve evaluation

pub mod interp;

// Re-export commonly used functions
pub use interp::{interp_points, interp_sampled};
