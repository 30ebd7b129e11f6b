//! Shared utilities for Duet packages.

pub mod logger;
pub mod time;
