//! Adapter implementations for task lifecycle ports.
//!
//! - [`memory`]: thread-safe in-memory store, audit log and project directory
//! - [`fault`]: fault injectors for simulated backend failures

pub mod fault;
pub mod memory;
