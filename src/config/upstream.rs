use chrono::Duration;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Where and how to reach the authorization server and the content API.
///
/// `client_id` and `client_secret` normally come from the `CLIENT_ID` and
/// `CLIENT_SECRET` environment variables rather than the YAML file.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct UpstreamConfig {
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_scope")]
    pub scope: String,
    #[serde(default = "default_timeout_in_ms")]
    pub timeout_in_ms: u64,
}

/// Query selection sent to the random-verse endpoint.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct VerseQueryConfig {
    #[serde(default = "default_words")]
    pub words: bool,
    #[serde(default = "default_translations")]
    pub translations: Vec<u32>,
    #[serde(default = "default_reciter")]
    pub reciter: u32,
    #[serde(default = "default_fields")]
    pub fields: Vec<String>,
}

impl Default for VerseQueryConfig {
    fn default() -> Self {
        Self {
            words: default_words(),
            translations: default_translations(),
            reciter: default_reciter(),
            fields: default_fields(),
        }
    }
}

impl VerseQueryConfig {
    /// Renders the selection as query pairs, lists joined with commas.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("words", self.words.to_string()),
            ("translations", join(&self.translations)),
            ("audio", self.reciter.to_string()),
            ("fields", self.fields.join(",")),
        ]
    }
}

fn join(ids: &[u32]) -> String {
    ids.iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Token cache tuning.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct TokenConfig {
    /// Subtracted from the reported token lifetime.
    #[serde(default = "default_safety_margin_secs")]
    pub safety_margin_secs: u64,
}

/// Largest accepted safety margin.
pub const MAX_SAFETY_MARGIN_SECS: u64 = 24 * 60 * 60;

impl TokenConfig {
    /// Rejects margins that cannot be a sensible fraction of a token lifetime.
    pub fn validate(&self) -> Result<(), String> {
        if self.safety_margin_secs > MAX_SAFETY_MARGIN_SECS {
            return Err(format!(
                "token.safety_margin_secs must be at most {} (got {})",
                MAX_SAFETY_MARGIN_SECS, self.safety_margin_secs
            ));
        }
        Ok(())
    }

    /// The margin as a duration, capped at [`MAX_SAFETY_MARGIN_SECS`].
    pub fn safety_margin(&self) -> Duration {
        let secs = self.safety_margin_secs.min(MAX_SAFETY_MARGIN_SECS);
        Duration::seconds(i64::try_from(secs).unwrap_or(0))
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            safety_margin_secs: default_safety_margin_secs(),
        }
    }
}

fn default_auth_url() -> String {
    "https://oauth2.quran.foundation/oauth2/token".to_string()
}

fn default_api_base_url() -> String {
    "https://apis.quran.foundation/content/api/v4".to_string()
}

fn default_scope() -> String {
    "content".to_string()
}

fn default_timeout_in_ms() -> u64 {
    10_000
}

fn default_words() -> bool {
    true
}

fn default_translations() -> Vec<u32> {
    vec![20, 131]
}

fn default_reciter() -> u32 {
    7
}

fn default_fields() -> Vec<String> {
    vec!["text_uthmani".to_string()]
}

fn default_safety_margin_secs() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_query_matches_content_api_selection() {
        let query = VerseQueryConfig::default().to_query();
        assert_eq!(
            query,
            vec![
                ("words", "true".to_string()),
                ("translations", "20,131".to_string()),
                ("audio", "7".to_string()),
                ("fields", "text_uthmani".to_string()),
            ]
        );
    }

    #[test]
    fn oversized_safety_margin_is_rejected_and_capped() {
        let token = TokenConfig {
            safety_margin_secs: u64::MAX,
        };

        assert!(token.validate().is_err());
        assert_eq!(
            token.safety_margin(),
            Duration::seconds(MAX_SAFETY_MARGIN_SECS as i64)
        );
        assert!(TokenConfig::default().validate().is_ok());
        assert_eq!(TokenConfig::default().safety_margin(), Duration::seconds(60));
    }
}
