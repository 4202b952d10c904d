use reqwest::header;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::GithubConfig;

const AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
const TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const USER_URL: &str = "https://api.github.com/user";

#[derive(Error, Debug)]
pub enum GithubError {
    #[error("GitHub request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("GitHub returned status {0}")]
    Api(u16),
    #[error("OAuth code exchange failed: {0}")]
    Exchange(String),
}

#[derive(Deserialize, Debug)]
pub struct GithubUser {
    pub id: i64,
    pub login: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Clone)]
pub struct GithubClient {
    http_client: Client,
    config: GithubConfig,
}

impl GithubClient {
    pub fn new(config: GithubConfig) -> GithubClient {
        GithubClient {
            http_client: Client::new(),
            config,
        }
    }

    pub fn authorize_url(&self, redirect_uri: &str) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&scope=read:user",
            AUTHORIZE_URL, self.config.client_id, redirect_uri
        )
    }

    pub async fn exchange_code(&self, code: &str) -> Result<String, GithubError> {
        #[derive(Serialize)]
        struct TokenRequest<'a> {
            client_id: &'a str,
            client_secret: &'a str,
            code: &'a str,
        }

        #[derive(Deserialize)]
        struct TokenResponse {
            access_token: Option<String>,
            error: Option<String>,
        }

        let response = self
            .http_client
            .post(TOKEN_URL)
            .header(header::ACCEPT, "application/json")
            .json(&TokenRequest {
                client_id: &self.config.client_id,
                client_secret: &self.config.client_secret,
                code,
            })
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(GithubError::Api(response.status().as_u16()));
        }

        let token: TokenResponse = response.json().await?;
        if let Some(error) = token.error {
            return Err(GithubError::Exchange(error));
        }
        token
            .access_token
            .ok_or_else(|| GithubError::Exchange("missing access_token".to_owned()))
    }

    pub async fn get_user(&self, access_token: &str) -> Result<GithubUser, GithubError> {
        let response = self
            .http_client
            .get(USER_URL)
            .bearer_auth(access_token)
            .header(header::USER_AGENT, "bookkeeper")
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(GithubError::Api(response.status().as_u16()));
        }
        Ok(response.json().await?)
    }
}
