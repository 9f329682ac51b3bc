//! Infrastructure layer - Port implementations
//!
//! This module contains concrete implementations of the domain ports
//! using actual hardware and system resources.

pub mod config;
pub mod drivers;
pub mod tasks;
pub mod types;
