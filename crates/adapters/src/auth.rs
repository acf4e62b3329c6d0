// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Access tokens for the remote API.
//!
//! gcloud tokens expire after about an hour while a run can poll for days,
//! so [`TokenCache`] re-fetches tokens older than [`TOKEN_MAX_AGE`] and on
//! demand when the server rejects one.

use crate::subprocess::{run_checked, CLI_TIMEOUT};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tokio::time::Instant;

/// Cached tokens are re-fetched once older than this.
pub const TOKEN_MAX_AGE: Duration = Duration::from_secs(45 * 60);

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no access token: {0}")]
    Unavailable(String),
}

/// Where fresh tokens come from
#[async_trait]
pub trait TokenSource: Send + Sync + 'static {
    async fn fetch(&self) -> Result<String, AuthError>;
}

/// A token given up front, e.g. from the environment. Never changes.
pub struct StaticToken(pub String);

#[async_trait]
impl TokenSource for StaticToken {
    async fn fetch(&self) -> Result<String, AuthError> {
        Ok(self.0.clone())
    }
}

/// Asks the gcloud CLI for the active account's token.
pub struct GcloudToken;

#[async_trait]
impl TokenSource for GcloudToken {
    async fn fetch(&self) -> Result<String, AuthError> {
        let mut cmd = Command::new("gcloud");
        cmd.args(["auth", "print-access-token"]);
        let token = run_checked(cmd, CLI_TIMEOUT, "gcloud auth print-access-token")
            .await
            .map_err(AuthError::Unavailable)?;
        if token.is_empty() {
            return Err(AuthError::Unavailable("gcloud printed an empty token".to_string()));
        }
        tracing::debug!("access token obtained from gcloud");
        Ok(token)
    }
}

/// Shared token with age-based and on-demand refresh.
#[derive(Clone)]
pub struct TokenCache {
    source: Arc<dyn TokenSource>,
    current: Arc<Mutex<Option<(String, Instant)>>>,
}

impl TokenCache {
    pub fn new(source: impl TokenSource) -> Self {
        Self { source: Arc::new(source), current: Arc::new(Mutex::new(None)) }
    }

    /// `explicit` when set and non-blank, else gcloud.
    pub fn from_explicit(explicit: Option<String>) -> Self {
        match explicit.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()) {
            Some(token) => Self::new(StaticToken(token)),
            None => Self::new(GcloudToken),
        }
    }

    /// The cached token, fetched first if missing or too old.
    pub async fn token(&self) -> Result<String, AuthError> {
        let cached = self
            .current
            .lock()
            .as_ref()
            .filter(|(_, at)| at.elapsed() < TOKEN_MAX_AGE)
            .map(|(token, _)| token.clone());
        match cached {
            Some(token) => Ok(token),
            None => self.refresh().await,
        }
    }

    /// Fetch a new token unconditionally.
    pub async fn refresh(&self) -> Result<String, AuthError> {
        let token = self.source.fetch().await?;
        *self.current.lock() = Some((token.clone(), Instant::now()));
        tracing::debug!("access token refreshed");
        Ok(token)
    }
}

/// Hands out the given tokens in order, repeating the last one.
#[cfg(any(test, feature = "test-support"))]
#[derive(Clone)]
pub struct FakeTokenSource {
    tokens: Arc<Vec<String>>,
    fetches: Arc<Mutex<usize>>,
}

#[cfg(any(test, feature = "test-support"))]
impl FakeTokenSource {
    pub fn rotating<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: Arc::new(tokens.into_iter().map(Into::into).collect()),
            fetches: Arc::new(Mutex::new(0)),
        }
    }

    pub fn fetches(&self) -> usize {
        *self.fetches.lock()
    }
}

#[cfg(any(test, feature = "test-support"))]
#[async_trait]
impl TokenSource for FakeTokenSource {
    async fn fetch(&self) -> Result<String, AuthError> {
        let mut fetches = self.fetches.lock();
        let token = self
            .tokens
            .get(*fetches)
            .or_else(|| self.tokens.last())
            .cloned()
            .ok_or_else(|| AuthError::Unavailable("no tokens configured".to_string()))?;
        *fetches += 1;
        Ok(token)
    }
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
