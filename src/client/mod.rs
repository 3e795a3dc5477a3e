//! Client side: fetching verses from the server, playing recitations and
//! keeping the display state.

pub mod audio;
pub mod display;
pub mod fetch;
pub mod render;

pub use audio::{AudioPlayer, EndedSignal, EndedSubscription, ProcessPlayer};
pub use display::{AyahDisplay, AyahView, FetchTicket, View};
pub use fetch::{AyahClient, AyahFeed};
