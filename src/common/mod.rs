//! # Common Components
//!
//! Shared utilities and data structures used by both the client and the stub backend.
//!
//! ## Modules
//!
//! - [`contract`]: the two backend contracts (endpoint paths, field name, JSON body)
//! - [`config`]: Configuration parsing utilities

pub mod config;
pub mod contract;
