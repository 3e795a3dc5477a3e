#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::Router;
use ayah_of_the_day::config::{Config, ConfigV1};
use ayah_of_the_day::routes::create_router;
use ayah_of_the_day::startup::build_state;
use figment::{
    providers::{Format, Yaml},
    Figment,
};
use serde_json::{json, Value};

/// Server config with both upstreams pointing at `upstream_url`.
pub fn load_test_config(upstream_url: &str) -> ConfigV1 {
    let yaml = format!(
        r#"
version: "1.0.0"
host: 127.0.0.1
port: 0
logging:
  level: "debug"
  format: "json"
upstream:
  auth_url: {upstream_url}/oauth2/token
  api_base_url: {upstream_url}/content/api/v4
  client_id: stub-client
  client_secret: stub-secret
  timeout_in_ms: 2000
verses:
  translations: [20, 131]
  reciter: 7
token:
  safety_margin_secs: 60
"#
    );

    let config: Config = Figment::new()
        .merge(Yaml::string(&yaml))
        .extract()
        .expect("Failed to parse test config YAML");

    match config {
        Config::ConfigV1(cfg) => cfg,
    }
}

pub fn build_app(config: ConfigV1) -> Router {
    let state = build_state(Arc::new(config)).expect("state should build");
    create_router(state)
}

pub fn get(path: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Body::empty())
        .expect("failed to build request")
}

pub fn token_body() -> String {
    json!({
        "access_token": "stub-token",
        "token_type": "bearer",
        "expires_in": 3600,
        "scope": "content"
    })
    .to_string()
}

pub fn verse_body(verse_key: &str) -> Value {
    json!({
        "verse": {
            "id": 1,
            "verse_number": 1,
            "verse_key": verse_key,
            "text_uthmani": "بِسْمِ ٱللَّهِ ٱلرَّحْمَـٰنِ ٱلرَّحِيمِ",
            "translations": [
                {"id": 1, "resource_id": 20, "text": "In the Name of Allah<sup foot_note=77>1</sup>"},
                {"id": 2, "resource_id": 131, "text": "In the name of God"}
            ],
            "audio": {"url": "AbdulBaset/Mujawwad/mp3/001001.mp3", "segments": [[0, 1, 0, 820]]},
            "words": [{"id": 1, "position": 1, "text_uthmani": "بِسْمِ"}]
        }
    })
}
