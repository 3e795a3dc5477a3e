use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The upstream random-verse response, kept exactly as received.
///
/// The server forwards it untouched, reading `verse_key` only for logging;
/// the other accessors serve the client display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AyahPayload(pub Value);

impl AyahPayload {
    fn verse(&self) -> Option<&Value> {
        self.0.get("verse")
    }

    fn verse_str(&self, field: &str) -> Option<&str> {
        self.verse()?.get(field)?.as_str()
    }

    pub fn text_uthmani(&self) -> Option<&str> {
        self.verse_str("text_uthmani")
    }

    pub fn verse_key(&self) -> Option<&str> {
        self.verse_str("verse_key")
    }

    /// Text of the first translation, which may carry footnote markup.
    pub fn translation(&self) -> Option<&str> {
        self.verse()?
            .get("translations")?
            .get(0)?
            .get("text")?
            .as_str()
    }

    /// Relative path of the recitation clip.
    pub fn audio_path(&self) -> Option<&str> {
        self.verse()?.get("audio")?.get("url")?.as_str()
    }

    /// Absolute recitation URL on `media_host`.
    pub fn audio_url(&self, media_host: &str) -> Option<String> {
        let path = self.audio_path()?;
        Some(format!(
            "{}/{}",
            media_host.trim_end_matches('/'),
            path.trim_start_matches('/')
        ))
    }

    pub fn into_inner(self) -> Value {
        self.0
    }
}
