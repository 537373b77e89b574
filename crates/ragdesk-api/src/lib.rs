// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

pub const SET_GROQ_API_KEY_PATH: &str = "/api/set-groq-api-key";
pub const LIST_COLLECTIONS_PATH: &str = "/api/list-collections";

#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            bail!("api.base_url must not be empty");
        }
        validate_base_url(&base_url)?;

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Hands the key to the backend. `Ok(false)` means the backend answered
    /// but refused it.
    pub fn set_groq_api_key(&self, api_key: &str) -> Result<bool> {
        let url = format!("{}{SET_GROQ_API_KEY_PATH}", self.base_url);
        tracing::debug!(%url, "posting groq api key");
        let response = self
            .http
            .post(url)
            .json(&SetKeyRequest { api_key })
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        let parsed: SuccessEnvelope = response.json().context("decode set-groq-api-key response")?;
        Ok(parsed.success)
    }

    pub fn list_collections(&self) -> Result<Vec<String>> {
        let response = self
            .http
            .get(format!("{}{LIST_COLLECTIONS_PATH}", self.base_url))
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        let parsed: CollectionsResponse = response.json().context("decode collection list")?;
        if !parsed.success {
            return Err(anyhow!(
                "backend could not list collections: {}",
                parsed.message.unwrap_or_else(|| "no message".to_owned())
            ));
        }
        Ok(parsed.collections)
    }
}

fn validate_base_url(base_url: &str) -> Result<()> {
    let parsed = Url::parse(base_url)
        .with_context(|| format!("api.base_url {base_url:?} is not a valid URL"))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => bail!("api.base_url {base_url:?} uses unsupported scheme {other:?}; use http or https"),
    }
}

fn connection_error(base_url: &str, error: reqwest::Error) -> anyhow::Error {
    anyhow!(
        "cannot reach backend at {} -- is the server running? ({})",
        base_url,
        error
    )
}

fn clean_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    if let Ok(parsed) = serde_json::from_str::<MessageEnvelope>(body)
        && let Some(message) = parsed.message
        && !message.is_empty()
    {
        return anyhow!("server error ({}): {}", status.as_u16(), message);
    }

    if let Ok(parsed) = serde_json::from_str::<ErrorEnvelope>(body)
        && let Some(error) = parsed.error
        && !error.is_empty()
    {
        return anyhow!("server error ({}): {}", status.as_u16(), error);
    }

    if body.len() < 100 && !body.contains('{') && !body.contains('<') {
        return anyhow!("server error ({}): {}", status.as_u16(), body.trim());
    }

    anyhow!("server returned {}", status.as_u16())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SetKeyRequest<'a> {
    api_key: &'a str,
}

#[derive(Debug, Deserialize)]
struct SuccessEnvelope {
    success: bool,
}

#[derive(Debug, Deserialize)]
struct CollectionsResponse {
    success: bool,
    #[serde(default)]
    collections: Vec<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageEnvelope {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<String>,
}
