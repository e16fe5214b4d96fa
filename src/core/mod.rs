//! Core types and constants for the ray-tracing core

pub mod constants;
pub mod types;

pub use constants::*;
pub use types::*;
