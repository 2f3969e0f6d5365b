//! Core types and trait definitions for the LeisureLink fixture generator.
//!
//! Entities, geographic primitives and the [`SeedStore`](store::SeedStore)
//! trait. No database or randomness dependencies live here.

#![allow(async_fn_in_trait)]

pub mod entity;
pub mod error;
pub mod geo;
pub mod store;

pub use error::{Error, Result};
