use anyhow::Context;
use serde::Deserialize;
use std::path::PathBuf;
use std::{env, fs};

use crate::ai::client::{DEFAULT_BASE_URL, DEFAULT_TEXT_MODEL, DEFAULT_VISION_MODEL};

#[derive(Deserialize, Clone)]
pub struct GithubConfig {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Deserialize, Clone)]
pub struct AiConfig {
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_text_model")]
    pub text_model: String,
    #[serde(default = "default_vision_model")]
    pub vision_model: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

fn default_text_model() -> String {
    DEFAULT_TEXT_MODEL.to_owned()
}

fn default_vision_model() -> String {
    DEFAULT_VISION_MODEL.to_owned()
}

#[derive(Deserialize)]
pub struct Config {
    pub database_url: String,
    pub github: GithubConfig,
    pub ai: AiConfig,
}

impl Config {
    pub fn from_file(path: PathBuf) -> Result<Config, anyhow::Error> {
        let config = fs::read_to_string(path).context("Unable to read config file")?;
        let config: Config =
            toml::from_str(config.as_str()).with_context(|| "Unable to parse config")?;
        Ok(config)
    }

    pub fn from_env() -> Result<Config, anyhow::Error> {
        let config = Config {
            database_url: read_env("DATABASE_URL")?,
            github: GithubConfig {
                client_id: read_env("GITHUB_CLIENT_ID")?,
                client_secret: read_env("GITHUB_CLIENT_SECRET")?,
            },
            ai: AiConfig {
                api_key: read_env("GLM_API_KEY")?,
                base_url: default_base_url(),
                text_model: default_text_model(),
                vision_model: default_vision_model(),
            },
        };
        Ok(config)
    }
}

fn read_env(key: &str) -> Result<String, anyhow::Error> {
    env::var(key).with_context(|| format!("Unable to read env var: {}", key))
}
