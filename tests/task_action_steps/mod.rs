//! Step definitions for task action behaviour tests.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
