//! Taskboard: a server-rendered task tracker.
//!
//! Users create tasks with a title and optional description, list them,
//! view details, edit them, toggle completion, and delete them through
//! browser forms.
//!
//! # Architecture
//!
//! Taskboard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, memory)
//!
//! # Modules
//!
//! - [`task`]: Task records, validation, storage, and lifecycle service
//! - [`web`]: Routes, handlers, form transport, and rendered pages
//! - [`config`]: Environment-driven runtime settings

pub mod config;
pub mod task;
pub mod web;
