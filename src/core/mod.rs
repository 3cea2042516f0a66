//! core
//!
//! Shared services used by the actions.
//!
//! # Modules
//!
//! - [`config`] - Configuration schema and loading
//! - [`naming`] - Branch naming rules
//! - [`commit`] - Commit message construction
//! - [`events`] - Domain events and subscribers
//!
//! # Design Principles
//!
//! - Configuration is an explicit value, loaded once
//! - Services are injected as trait objects, never looked up

pub mod commit;
pub mod config;
pub mod events;
pub mod naming;
