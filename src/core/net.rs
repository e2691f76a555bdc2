// src/core/net.rs

// Blocking HTTP GET. One attempt per call; no retry.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::consts::{HTTP_TIMEOUT_SECS, USER_AGENT};
use crate::error::{Error, Result, Stage};

fn client(stage: Stage, url: &str) -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .build()
        .map_err(|e| Error::fetch(stage, url, e))
}

/// GET `url` and return the body as text. Non-2xx statuses are errors.
pub fn http_get(stage: Stage, url: &str) -> Result<String> {
    debug!(%url, "GET");
    let resp = client(stage, url)?
        .get(url)
        .send()
        .map_err(|e| Error::fetch(stage, url, e))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(Error::fetch(stage, url, format!("HTTP {status}")));
    }
    resp.text().map_err(|e| Error::fetch(stage, url, e))
}

/// GET `url` with query parameters and decode a JSON body.
pub fn http_get_json<T: DeserializeOwned>(
    stage: Stage,
    url: &str,
    query: &[(&str, &str)],
) -> Result<T> {
    debug!(%url, ?query, "GET json");
    let resp = client(stage, url)?
        .get(url)
        .query(query)
        .send()
        .map_err(|e| Error::fetch(stage, url, e))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(Error::fetch(stage, url, format!("HTTP {status}")));
    }
    resp.json::<T>().map_err(|e| Error::parse(stage, format!("{url}: {e}")))
}
