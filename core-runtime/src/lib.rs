//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the book catalog core:
//! - Logging and tracing infrastructure
//! - Configuration management
//!
//! ## Overview
//!
//! This crate contains the runtime utilities the catalog depends on. It
//! establishes the logging conventions and the fail-fast configuration builder
//! used to wire platform bridges into the core.

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
