// This module re-exports important pieces for convenience,
// so we can "use crate::config::*" easily.
pub mod client;
pub mod logging;
pub mod types;
pub mod upstream;

pub use client::*;
pub use logging::*;
pub use types::*;
pub use upstream::*;
