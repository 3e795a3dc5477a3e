use figment::providers::{Env, Serialized};
use figment::Figment;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::logging::LoggingConfig;

/// Settings for the terminal client, read from `AYAH_*` environment variables.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct ClientConfig {
    /// Full URL of the server's random-ayah endpoint.
    pub api_url: String,
    /// Host prefixed to the relative audio path returned upstream.
    pub media_host: String,
    /// Command line of the audio player; the clip URL is appended.
    pub player: String,
    pub log_level: String,
    pub log_format: String,
    pub timeout_in_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3000/api/random-ayah".to_string(),
            media_host: "https://verses.quran.foundation".to_string(),
            player: "mpv --no-video --really-quiet".to_string(),
            log_level: "warn".to_string(),
            log_format: "console".to_string(),
            timeout_in_ms: 15_000,
        }
    }
}

impl ClientConfig {
    pub fn player_command(&self) -> Vec<String> {
        self.player.split_whitespace().map(str::to_string).collect()
    }

    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.log_level.clone(),
            format: self.log_format.clone(),
            service_name: "ayah-client".to_string(),
            ..LoggingConfig::default()
        }
    }
}

pub fn load_client_config() -> Result<ClientConfig, figment::Error> {
    Figment::from(Serialized::defaults(ClientConfig::default()))
        .merge(Env::prefixed("AYAH_"))
        .extract()
}
