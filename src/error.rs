//! Error handling for codec operations
//!
//! This module re-exports the error types defined alongside the shared
//! codec types, so callers can `use assetlz::error::*` without pulling in
//! the rest of the common module.

pub use crate::common::AssetLzError;
pub use crate::common::Result;
