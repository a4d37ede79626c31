//! Task tracking for Taskboard.
//!
//! A task is created with a required title and an optional description,
//! can be revised, toggled between pending and completed, and deleted. The
//! module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
