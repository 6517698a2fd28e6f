// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use lista_app::Item;
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Blocking client for the catalog endpoint. One GET, no auth, no query
/// parameters; the body is a JSON array of `{id, listId, name}` objects.
#[derive(Debug, Clone)]
pub struct Client {
    endpoint: Url,
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let trimmed = endpoint.trim();
        if trimmed.is_empty() {
            bail!("source.url must not be empty");
        }

        let endpoint = Url::parse(trimmed)
            .with_context(|| format!("parse catalog endpoint {trimmed:?}"))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            bail!(
                "unsupported scheme {:?} in source.url; use http or https",
                endpoint.scheme()
            );
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            endpoint,
            timeout,
            http,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetches the entire catalog. Items with a null or absent `name` decode
    /// successfully; items missing `id` or `listId` fail the decode.
    pub fn fetch_items(&self) -> Result<Vec<Item>> {
        let response = self
            .http
            .get(self.endpoint.clone())
            .send()
            .map_err(|error| connection_error(&self.endpoint, error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(status_error(status, &body));
        }

        response.json().context("decode catalog items")
    }
}

fn connection_error(endpoint: &Url, error: reqwest::Error) -> anyhow::Error {
    anyhow!("cannot reach {endpoint} -- check the network and source.url ({error})")
}

fn status_error(status: StatusCode, body: &str) -> anyhow::Error {
    if let Ok(parsed) = serde_json::from_str::<ErrorEnvelope>(body)
        && let Some(message) = parsed.message
        && !message.is_empty()
    {
        return anyhow!("server returned {}: {}", status.as_u16(), message);
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() && trimmed.len() < 100 && !trimmed.contains('{') {
        return anyhow!("server returned {}: {}", status.as_u16(), trimmed);
    }

    anyhow!("server returned {}", status.as_u16())
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    message: Option<String>,
}
