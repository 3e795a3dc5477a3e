use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::logging::LoggingConfig;
use super::upstream::{TokenConfig, UpstreamConfig, VerseQueryConfig};

/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_ENV: &str = "AYAH_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "./config.yaml";

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct ConfigV1 {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub logging: LoggingConfig,
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub verses: VerseQueryConfig,
    #[serde(default)]
    pub token: TokenConfig,
}

impl ConfigV1 {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Builds the figment for a config file plus environment overrides.
///
/// `CLIENT_ID`/`CLIENT_SECRET` land in `upstream`, `PORT` overrides the port,
/// and any other key can be set with `AYAH_` and `__` as the nesting separator
/// (e.g. `AYAH_LOGGING__LEVEL=debug`).
pub fn figment_for(path: &str) -> Figment {
    Figment::new()
        .merge(Yaml::file(path))
        .merge(
            Env::raw()
                .only(&["CLIENT_ID", "CLIENT_SECRET"])
                .map(|key| format!("upstream.{}", key).into()),
        )
        .merge(Env::raw().only(&["PORT"]))
        .merge(
            Env::prefixed("AYAH_")
                .ignore(&["CONFIG", "API_URL", "MEDIA_HOST", "PLAYER"])
                .split("__"),
        )
}

/// Extracts and unwraps a versioned config from the given file.
pub fn load_config_from(path: &str) -> Result<ConfigV1, figment::Error> {
    let cfg = match figment_for(path).extract::<Config>()? {
        Config::ConfigV1(c) => c,
    };
    cfg.token.validate().map_err(figment::Error::from)?;
    Ok(cfg)
}

/// Load config from `$AYAH_CONFIG`, falling back to "config.yaml" in the current directory.
pub fn load_config() -> ConfigV1 {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    match load_config_from(&path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading configuration from {}: {}", path, e);
            std::process::exit(1);
        }
    }
}

/// Print the JSON schema for the configuration to stdout.
pub fn print_schema() -> Result<(), serde_json::Error> {
    let schema = schema_for!(Config);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    const MINIMAL: &str = r#"
version: "1.0.0"
upstream:
  client_id: from-file
  client_secret: file-secret
"#;

    #[test]
    fn minimal_file_gets_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file("config.yaml", MINIMAL)?;
            let cfg = load_config_from("config.yaml")?;
            assert_eq!(cfg.bind_address(), "0.0.0.0:3000");
            assert_eq!(cfg.upstream.scope, "content");
            assert_eq!(cfg.upstream.timeout_in_ms, 10_000);
            assert_eq!(cfg.verses.translations, vec![20, 131]);
            assert_eq!(cfg.token.safety_margin_secs, 60);
            assert_eq!(cfg.logging.level, "info");
            Ok(())
        });
    }

    #[test]
    fn environment_overrides_credentials_and_port() {
        Jail::expect_with(|jail| {
            jail.create_file("config.yaml", MINIMAL)?;
            jail.set_env("CLIENT_ID", "env-client");
            jail.set_env("CLIENT_SECRET", "env-secret");
            jail.set_env("PORT", "8088");
            jail.set_env("AYAH_LOGGING__LEVEL", "debug");

            let cfg = load_config_from("config.yaml")?;
            assert_eq!(cfg.upstream.client_id, "env-client");
            assert_eq!(cfg.upstream.client_secret, "env-secret");
            assert_eq!(cfg.port, 8088);
            assert_eq!(cfg.logging.level, "debug");
            Ok(())
        });
    }

    #[test]
    fn oversized_safety_margin_fails_to_load() {
        Jail::expect_with(|jail| {
            jail.create_file("config.yaml", MINIMAL)?;
            jail.set_env("AYAH_TOKEN__SAFETY_MARGIN_SECS", "18446744073709551615");

            let err = load_config_from("config.yaml").unwrap_err();
            assert!(err.to_string().contains("safety_margin_secs"));
            Ok(())
        });
    }

    #[test]
    fn missing_credentials_is_an_error() {
        Jail::expect_with(|jail| {
            jail.create_file("config.yaml", "version: \"1.0.0\"\nupstream: {}\n")?;
            assert!(load_config_from("config.yaml").is_err());
            Ok(())
        });
    }
}
