use config::{Config as Cfg, File};
use serde::Deserialize;
use std::env;

use crate::error::AppError;

#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    #[serde(flatten)]
    pub common: CommonConfig,
    pub openai: OpenAiSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommonConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8080
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub base_url: String,
    pub text_model: String,
    pub image_model: String,
}

impl CommonConfig {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

impl RelayConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = CommonConfig::load()?;

        Ok(RelayConfig {
            common,
            openai: OpenAiSettings {
                // An absent key must not fail startup; the provider surfaces
                // it per request so health and CORS stay reachable.
                api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
                base_url: get_env("OPENAI_BASE_URL", Some("https://api.openai.com/v1"))?,
                text_model: get_env("RELAY_TEXT_MODEL", Some("gpt-4.1-mini"))?,
                image_model: get_env("RELAY_IMAGE_MODEL", Some("gpt-image-1"))?,
            },
        })
    }
}

fn get_env(key: &str, default: Option<&str>) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => match default {
            Some(def) => Ok(def.to_string()),
            None => Err(AppError::Config(format!(
                "{} is required but not set",
                key
            ))),
        },
    }
}
