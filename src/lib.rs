//! Taskwright: lifecycle core of an ML-ops task dashboard.
//!
//! The crate tracks forecasting, classification and regression tasks from
//! creation through a terminal state. It validates user actions against a
//! status-driven menu, runs them through a simulated network round trip
//! with injectable failures, holds disruptive actions behind explicit
//! confirmation, copies tasks, and answers filtered and sorted listings.
//!
//! # Architecture
//!
//! Taskwright follows hexagonal architecture principles:
//!
//! - **Domain**: Task model and lifecycle rules with no infrastructure
//!   dependencies
//! - **Ports**: Trait interfaces for the task store, audit log, fault
//!   injection and project lookup
//! - **Adapters**: In-memory and randomised implementations of the ports
//! - **Services**: Executor, confirmation gate, copy, intake and query
//!
//! # Modules
//!
//! - [`task`]: Task lifecycle, actions and queries

pub mod task;
