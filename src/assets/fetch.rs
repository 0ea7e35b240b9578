// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine as _;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssetError {
    #[error("unsupported asset url `{url}`")]
    UnsupportedScheme { url: String },
    #[error("malformed data url: {reason}")]
    MalformedDataUrl { reason: &'static str },
    #[error("failed to decode base64 payload: {reason}")]
    Decode { reason: String },
    #[error("failed to read {path:?}: {reason}")]
    Io { path: PathBuf, reason: String },
    #[error("fetch of `{url}` failed: {reason}")]
    Fetch { url: String, reason: String },
}

/// Turns an asset url into its bytes.
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AssetError>;
}

/// `data:<mime>;base64,<payload>` urls.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataUrlFetcher;

impl DataUrlFetcher {
    pub fn decode(url: &str) -> Result<Vec<u8>, AssetError> {
        let rest = url
            .strip_prefix("data:")
            .ok_or(AssetError::MalformedDataUrl { reason: "missing `data:` prefix" })?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or(AssetError::MalformedDataUrl { reason: "missing `,` separator" })?;
        if !header.ends_with(";base64") {
            return Ok(payload.as_bytes().to_vec());
        }
        base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|err| AssetError::Decode { reason: err.to_string() })
    }
}

#[async_trait]
impl AssetFetcher for DataUrlFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AssetError> {
        Self::decode(url)
    }
}

/// `file://` urls and bare paths, read with `tokio::fs`.
///
/// Relative paths resolve against `base_dir` when one is set.
#[derive(Debug, Clone, Default)]
pub struct FileFetcher {
    base_dir: Option<PathBuf>,
}

impl FileFetcher {
    pub fn new(base_dir: Option<PathBuf>) -> Self {
        Self { base_dir }
    }

    fn resolve(&self, url: &str) -> PathBuf {
        let raw = PathBuf::from(url.strip_prefix("file://").unwrap_or(url));
        match &self.base_dir {
            Some(base) if raw.is_relative() => base.join(raw),
            _ => raw,
        }
    }
}

#[async_trait]
impl AssetFetcher for FileFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AssetError> {
        let path = self.resolve(url);
        tokio::fs::read(&path)
            .await
            .map_err(|err| AssetError::Io { path, reason: err.to_string() })
    }
}

/// Dispatches on the url scheme (`data`, `file`, ...).
#[derive(Clone, Default)]
pub struct RoutingFetcher {
    routes: BTreeMap<String, Arc<dyn AssetFetcher>>,
}

impl RoutingFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// `data:` and `file://` urls with files resolved against `base_dir`.
    pub fn with_defaults(base_dir: Option<PathBuf>) -> Self {
        Self::new()
            .route("data", Arc::new(DataUrlFetcher))
            .route("file", Arc::new(FileFetcher::new(base_dir)))
    }

    pub fn route(mut self, scheme: impl Into<String>, fetcher: Arc<dyn AssetFetcher>) -> Self {
        self.routes.insert(scheme.into(), fetcher);
        self
    }

    fn scheme(url: &str) -> Option<&str> {
        let (scheme, _) = url.split_once(':')?;
        let valid = !scheme.is_empty()
            && scheme.chars().all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '+' | '-' | '.'));
        valid.then_some(scheme)
    }
}

impl std::fmt::Debug for RoutingFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutingFetcher").field("schemes", &self.routes.keys()).finish()
    }
}

#[async_trait]
impl AssetFetcher for RoutingFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AssetError> {
        let fetcher = Self::scheme(url)
            .and_then(|scheme| self.routes.get(&scheme.to_ascii_lowercase()))
            .ok_or_else(|| AssetError::UnsupportedScheme { url: url.to_owned() })?;
        tracing::debug!(url = %truncate(url), "fetching asset");
        fetcher.fetch(url).await
    }
}

/// Data urls can be huge; keep log lines short.
fn truncate(url: &str) -> &str {
    match url.char_indices().nth(64) {
        Some((index, _)) => &url[..index],
        None => url,
    }
}
