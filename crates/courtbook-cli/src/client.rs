//! Async HTTP client for the team admin API.

use std::{future::Future, time::Duration};

use anyhow::Context;
use courtbook_core::{booking::Booking, member::Member, source::BookingSource};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::json;
use thiserror::Error;

/// Connection settings for the admin API.
///
/// The bearer token is handed in by the caller; the client never fetches or
/// refreshes it on its own.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub token:    Option<String>,
}

#[derive(Debug, Error)]
pub enum ClientError {
  #[error("{method} {path} failed: {source}")]
  Transport {
    method: &'static str,
    path:   &'static str,
    #[source]
    source: reqwest::Error,
  },

  #[error("{method} {path} → {status}")]
  Status {
    method: &'static str,
    path:   &'static str,
    status: StatusCode,
  },

  #[error("deserialising {path}: {source}")]
  Decode {
    path:   &'static str,
    #[source]
    source: reqwest::Error,
  },
}

/// Body of `GET /setting/defaultData`.
#[derive(Debug, Clone, Deserialize)]
pub struct TeamDefaults {
  pub team_name: String,
}

/// Async HTTP client for the admin JSON API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> anyhow::Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  pub fn config(&self) -> &ApiConfig { &self.config }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }

  fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    match &self.config.token {
      Some(token) if !token.is_empty() => req.bearer_auth(token),
      _ => req,
    }
  }

  async fn get_json<T: DeserializeOwned>(&self, path: &'static str) -> Result<T, ClientError> {
    let resp = self
      .auth(self.client.get(self.url(path)))
      .send()
      .await
      .map_err(|source| ClientError::Transport {
        method: "GET",
        path,
        source,
      })?;

    if !resp.status().is_success() {
      return Err(ClientError::Status {
        method: "GET",
        path,
        status: resp.status(),
      });
    }
    resp
      .json()
      .await
      .map_err(|source| ClientError::Decode { path, source })
  }

  // ── Bookings ──────────────────────────────────────────────────────────────

  /// `GET /books/getBooks`
  pub async fn list_bookings(&self) -> Result<Vec<Booking>, ClientError> {
    self.get_json("/books/getBooks").await
  }

  // ── Members ───────────────────────────────────────────────────────────────

  /// `GET /members/getMembers`
  pub async fn list_members(&self) -> Result<Vec<Member>, ClientError> {
    self.get_json("/members/getMembers").await
  }

  // ── Settings ──────────────────────────────────────────────────────────────

  /// `GET /setting/defaultData`
  pub async fn team_defaults(&self) -> Result<TeamDefaults, ClientError> {
    self.get_json("/setting/defaultData").await
  }

  /// `POST /setting/updateDefault` with `{"target":"team_name","value":...}`.
  ///
  /// The server rejects names already taken by another team.
  pub async fn update_team_name(&self, value: &str) -> Result<(), ClientError> {
    const PATH: &str = "/setting/updateDefault";
    let resp = self
      .auth(self.client.post(self.url(PATH)))
      .json(&json!({ "target": "team_name", "value": value }))
      .send()
      .await
      .map_err(|source| ClientError::Transport {
        method: "POST",
        path: PATH,
        source,
      })?;

    if !resp.status().is_success() {
      return Err(ClientError::Status {
        method: "POST",
        path:   PATH,
        status: resp.status(),
      });
    }
    Ok(())
  }
}

impl BookingSource for ApiClient {
  type Error = ClientError;

  fn fetch(&self) -> impl Future<Output = Result<Vec<Booking>, Self::Error>> + Send + '_ {
    self.list_bookings()
  }
}
