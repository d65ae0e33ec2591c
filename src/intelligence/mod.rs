// ABOUTME: Intelligence layer for the coaching agent
// ABOUTME: Houses the deterministic energy-metrics calculator used by plan evaluation
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Intelligence Layer
//!
//! Deterministic, side-effect-free calculations the controller relies on
//! when judging plan compliance. The planning engine may be an opaque
//! model; the numbers it is judged against come from here.

pub mod metrics;

pub use metrics::{calculate_metrics, Metrics};
