//! Configuration loader and schema types.
//!
//! This module exposes the settings schema that drives the service adapter,
//! the external player, key bindings and logging, plus helpers to load it
//! from disk and the environment.

mod load;
mod schema;

pub use schema::*;
