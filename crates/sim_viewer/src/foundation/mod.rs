//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the viewer:
//! - Math types and the transform utility
//! - Frame timing
//! - Logging setup

pub mod math;
pub mod time;
pub mod logging;
