//! Task lifecycle management for the ML-ops dashboard.
//!
//! This module owns the task state machine and everything that drives it:
//! deciding which actions a task offers in each status, executing those
//! actions against a simulated backend with latency and transient failure,
//! holding disruptive actions until confirmed, copying tasks, and filtering
//! and sorting the task collection for display. The module follows
//! hexagonal architecture:
//!
//! - Domain types and lifecycle rules in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]
//! - Executor settings in [`config`]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
