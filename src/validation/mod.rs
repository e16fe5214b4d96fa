//! Input validation and error reporting

pub mod error;

pub use error::RayTraceError;
