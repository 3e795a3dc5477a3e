//! The verse display as a state machine, independent of how it is drawn.

use tracing::{debug, warn};

use super::audio::{AudioPlayer, EndedSubscription};
use super::fetch::AyahFeed;
use crate::models::AyahPayload;

/// Identifies one fetch; only the most recent ticket may complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// What should be on screen right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Loading,
    Failed,
    Ayah(AyahView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AyahView {
    pub text: String,
    pub translation: String,
    pub verse_key: String,
    pub audio_enabled: bool,
    pub is_playing: bool,
    pub is_loading: bool,
}

/// Holds the current ayah and drives its recitation.
///
/// The ended-subscription is taken when an ayah is accepted and dropped when
/// it is replaced or the display is unmounted.
pub struct AyahDisplay<P: AudioPlayer> {
    player: P,
    media_host: String,
    ayah: Option<AyahPayload>,
    is_loading: bool,
    is_playing: bool,
    latest: u64,
    ended: Option<EndedSubscription>,
}

impl<P: AudioPlayer> AyahDisplay<P> {
    pub fn new(player: P, media_host: impl Into<String>) -> Self {
        Self {
            player,
            media_host: media_host.into(),
            ayah: None,
            is_loading: true,
            is_playing: false,
            latest: 0,
            ended: None,
        }
    }

    pub fn ayah(&self) -> Option<&AyahPayload> {
        self.ayah.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// A new fetch may only be requested once the previous one has settled.
    pub fn can_refetch(&self) -> bool {
        !self.is_loading
    }

    /// Initial fetch.
    pub async fn mount<F: AyahFeed + ?Sized>(&mut self, feed: &F) {
        self.refetch(feed).await;
    }

    /// Runs one full fetch cycle against `feed`.
    pub async fn refetch<F: AyahFeed + ?Sized>(&mut self, feed: &F) {
        let ticket = self.begin_fetch();
        let result = feed.get_random_ayah().await;
        self.complete_fetch(ticket, result);
    }

    /// Marks a fetch as started. Any playing recitation is stopped here,
    /// before the new verse arrives.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.latest += 1;
        self.is_loading = true;
        if self.is_playing {
            self.player.stop();
            self.is_playing = false;
        }
        FetchTicket(self.latest)
    }

    /// Applies a fetch result. Returns `false` when the ticket has been
    /// superseded and the result was discarded.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, result: Option<AyahPayload>) -> bool {
        if ticket.0 != self.latest {
            debug!(
                ticket = ticket.0,
                latest = self.latest,
                "discarding stale fetch result"
            );
            return false;
        }

        self.is_loading = false;
        self.ended = None;
        self.is_playing = false;
        self.player
            .load(result.as_ref().and_then(|a| a.audio_url(&self.media_host)));
        if result.is_some() {
            self.ended = Some(self.player.subscribe_ended());
        }
        self.ayah = result;
        true
    }

    fn has_audio(&self) -> bool {
        self.ayah
            .as_ref()
            .is_some_and(|a| a.audio_path().is_some())
    }

    /// Flips playback. Ignored (returns `false`) while loading or when there
    /// is nothing to play.
    pub fn toggle_audio(&mut self) -> bool {
        if self.is_loading || !self.has_audio() {
            return false;
        }

        if self.is_playing {
            self.player.pause();
            self.is_playing = false;
        } else {
            if let Err(e) = self.player.play() {
                warn!("Could not start recitation: {}", e);
                return false;
            }
            self.is_playing = true;
        }
        true
    }

    /// Resolves when the current ayah's recitation ends by itself, leaving
    /// the display stopped. Pending forever while no ayah is shown. Cancel safe.
    pub async fn audio_ended(&mut self) {
        match self.ended.as_mut() {
            Some(sub) => sub.ended().await,
            None => std::future::pending::<()>().await,
        }
        self.is_playing = false;
    }

    /// Stops playback and releases the ended-subscription.
    pub fn unmount(&mut self) {
        self.ended = None;
        self.is_playing = false;
        self.player.stop();
        self.ayah = None;
    }

    pub fn view(&self) -> View {
        match &self.ayah {
            None if self.is_loading => View::Loading,
            None => View::Failed,
            Some(ayah) => View::Ayah(AyahView {
                text: ayah.text_uthmani().unwrap_or_default().to_string(),
                translation: ayah.translation().unwrap_or_default().to_string(),
                verse_key: ayah.verse_key().unwrap_or_default().to_string(),
                audio_enabled: self.has_audio() && !self.is_loading,
                is_playing: self.is_playing,
                is_loading: self.is_loading,
            }),
        }
    }
}
