//! Utilities
pub mod fmt;
pub mod save;
pub mod stats;
