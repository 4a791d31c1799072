//! Utilities for sqleton
//!
//! This module provides utility functions used across the library.

pub mod logging;

pub use logging::init_logging;
