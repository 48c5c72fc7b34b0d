//! This module aggregates various utility submodules used throughout the application.

/// Startup configuration loaded from the environment.
pub mod config;
