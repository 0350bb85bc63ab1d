//! Common types, traits, and error definitions for kinorrt
//!
//! This module provides the foundational building blocks used across
//! the planning, smoothing, and control modules.

pub mod types;
pub mod traits;
pub mod error;

pub use types::*;
pub use traits::*;
pub use error::*;
