//! Library exports for ayah-of-the-day, shared between the binaries and tests.

pub mod auth;
pub mod client;
pub mod config;
pub mod content;
pub mod error;
pub mod models;
pub mod routes;
pub mod startup;
pub mod state;
pub mod utils;
