//! Synthetic dataset generator for the LeisureLink event-planning app.
//!
//! A run is driven by the [`Orchestrator`]: it asks the factory for users,
//! categories, events and comments, reads back the persisted identifiers and
//! hands them to the linker, which wires categories, memberships and comments
//! onto events. Everything goes through a [`SeedStore`] backend.
//!
//! [`SeedStore`]: leisurelink_core::store::SeedStore

pub mod assets;
pub mod config;
pub mod context;
pub mod error;
pub mod factory;
pub mod fake;
pub mod geo;
pub mod hash;
pub mod linker;
pub mod orchestrator;
pub mod report;
pub mod unit;

pub use config::SeedConfig;
pub use context::GenContext;
pub use error::{Error, Result};
pub use orchestrator::{Orchestrator, Phase, RunFailure};
pub use report::{PhaseReport, RunReport, Tally};
