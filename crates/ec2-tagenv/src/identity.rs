// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Instance identity resolution against the EC2 metadata service (IMDS).
//!
//! Resolution is best effort: the identity feeds a later describe call that
//! fails loudly when the values are invalid, so a metadata outage degrades to
//! an empty identity instead of aborting the program.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::TagEnvError;

/// Well-known link-local address of the EC2 metadata service.
const DEFAULT_METADATA_BASE_URL: &str = "http://169.254.169.254";
/// IMDSv2 session token endpoint.
const TOKEN_PATH: &str = "/latest/api/token";
/// Dynamic identity document endpoint (JSON with region and instance id).
const IDENTITY_DOCUMENT_PATH: &str = "/latest/dynamic/instance-identity/document";
const TOKEN_TTL_HEADER: &str = "x-aws-ec2-metadata-token-ttl-seconds";
const TOKEN_HEADER: &str = "x-aws-ec2-metadata-token";
const TOKEN_TTL_SECONDS: &str = "21600";

/// IMDS is link-local; anything slower than this means we are not on EC2.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(1);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Region and instance id of the instance this process runs on.
///
/// Produced once per run and immutable thereafter. The default (empty) value
/// is what callers get when the metadata service is unreachable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityInfo {
    pub region: String,
    pub instance_id: String,
}

/// Capability seam for identity resolution so tests can substitute a fixed
/// identity for the IMDS-backed production resolver.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Returns the identity of the current instance, empty on failure.
    async fn resolve(&self) -> IdentityInfo;
}

/// Production resolver that queries the instance identity document from IMDS,
/// preferring IMDSv2 session tokens and falling back to IMDSv1.
#[derive(Debug, Clone)]
pub struct ImdsResolver {
    client: reqwest::Client,
    base_url: String,
}

/// Subset of the instance identity document we care about.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdentityDocument {
    #[serde(default)]
    region: String,
    #[serde(default)]
    instance_id: String,
}

impl ImdsResolver {
    /// Builds a resolver against the well-known link-local endpoint.
    pub fn new() -> Result<Self, TagEnvError> {
        Self::with_base_url(DEFAULT_METADATA_BASE_URL)
    }

    /// Builds a resolver against a custom metadata endpoint.
    ///
    /// Used by tests and by environments that proxy the metadata service.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, TagEnvError> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    /// Requests an IMDSv2 session token; `None` means fall back to IMDSv1.
    async fn session_token(&self) -> Option<String> {
        let url = format!("{}{}", self.base_url, TOKEN_PATH);
        let response = self
            .client
            .put(url)
            .header(TOKEN_TTL_HEADER, TOKEN_TTL_SECONDS)
            .send()
            .await;
        match response {
            Ok(response) if response.status().is_success() => response.text().await.ok(),
            Ok(response) => {
                debug!(
                    status = %response.status(),
                    "metadata token endpoint refused, falling back to IMDSv1"
                );
                None
            }
            Err(err) => {
                debug!("metadata token request failed, falling back to IMDSv1: {err}");
                None
            }
        }
    }

    async fn identity_document(&self) -> Result<IdentityDocument, TagEnvError> {
        let token = self.session_token().await;
        let url = format!("{}{}", self.base_url, IDENTITY_DOCUMENT_PATH);
        let mut request = self.client.get(url);
        if let Some(token) = &token {
            request = request.header(TOKEN_HEADER, token);
        }
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(TagEnvError::Metadata(format!(
                "identity document request returned {}",
                response.status()
            )));
        }
        Ok(response.json::<IdentityDocument>().await?)
    }
}

#[async_trait]
impl IdentityResolver for ImdsResolver {
    async fn resolve(&self) -> IdentityInfo {
        match self.identity_document().await {
            Ok(document) => IdentityInfo {
                region: document.region,
                instance_id: document.instance_id,
            },
            Err(err) => {
                warn!("unable to resolve instance identity: {err}");
                IdentityInfo::default()
            }
        }
    }
}
