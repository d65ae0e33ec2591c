// ABOUTME: Configuration module for the coaching agent
// ABOUTME: Environment-driven settings resolved once at the composition root
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Configuration
//!
//! All configuration is environment-driven and resolved once at startup.
//! Required values fail fast with a configuration error; nothing degrades
//! into a silent no-op.

pub mod environment;

pub use environment::ServerConfig;
