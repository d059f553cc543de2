//! Utility functions and helper modules.

pub mod validation;

pub use validation::*;
