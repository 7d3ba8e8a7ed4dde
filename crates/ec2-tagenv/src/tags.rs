// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Tag fetching: a describe-instances call wrapped in the retry policy, with
//! the result flattened into a single key/value map.

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::debug;

use crate::error::TagEnvError;
use crate::retry::{retry_with_backoff, BackoffConfig};

/// One tag attached to an instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// One instance within a reservation.
#[derive(Debug, Clone, Default)]
pub struct Instance {
    pub tags: Vec<Tag>,
}

/// One result grouping returned by the describe call.
#[derive(Debug, Clone, Default)]
pub struct Reservation {
    pub instances: Vec<Instance>,
}

/// Seam over the describe-instances control-plane call so the retry and
/// flattening logic can be exercised without AWS credentials.
#[async_trait]
pub trait InstanceDescriber: Send + Sync {
    /// Describes the given instance, returning the raw reservation groupings.
    async fn describe_instance(&self, instance_id: &str) -> Result<Vec<Reservation>, TagEnvError>;
}

/// Flattens every tag across reservations and instances into one map.
///
/// Duplicate keys across instances silently overwrite (last-write-wins); the
/// order in which EC2 returns reservations and instances is unspecified.
pub fn flatten_tags(reservations: &[Reservation]) -> HashMap<String, String> {
    let mut tags = HashMap::new();
    for reservation in reservations {
        for instance in &reservation.instances {
            for tag in &instance.tags {
                tags.insert(tag.key.clone(), tag.value.clone());
            }
        }
    }
    tags
}

/// Fetches the tag set of an instance, retrying transient describe failures
/// within the backoff budget.
pub struct TagFetcher {
    describer: Box<dyn InstanceDescriber>,
    backoff: BackoffConfig,
}

impl TagFetcher {
    pub fn new(describer: Box<dyn InstanceDescriber>, backoff: BackoffConfig) -> Self {
        Self { describer, backoff }
    }

    /// Returns the flattened tag map for `instance_id`.
    ///
    /// A describe call that succeeds with zero reservations is an empty tag
    /// set, not an error. Backoff exhaustion surfaces the last describe error.
    pub async fn fetch(&self, instance_id: &str) -> Result<HashMap<String, String>, TagEnvError> {
        let reservations = retry_with_backoff(self.backoff, || {
            self.describer.describe_instance(instance_id)
        })
        .await?;
        if reservations.is_empty() {
            debug!("describe-instances returned no reservations for {instance_id}");
            return Ok(HashMap::new());
        }
        let tags = flatten_tags(&reservations);
        debug!("collected {} tags for {instance_id}", tags.len());
        Ok(tags)
    }
}
