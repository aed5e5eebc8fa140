//! Pixnum - paint-by-numbers puzzle server
//!
//! Serves puzzles converted by `pixnum-engine` over a JSON API.
//! This library exposes modules for integration testing.

pub mod api;
pub mod assets;
pub mod error;
pub mod models;
pub mod server;
pub mod services;
