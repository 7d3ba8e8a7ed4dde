// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! EC2-backed [`InstanceDescriber`] using the AWS SDK with ambient credentials.

use async_trait::async_trait;
use aws_config::Region;
use aws_sdk_ec2::error::DisplayErrorContext;

use crate::error::TagEnvError;
use crate::tags::{Instance, InstanceDescriber, Reservation, Tag};

/// Describes instances through the EC2 control-plane API, scoped to a region.
#[derive(Debug, Clone)]
pub struct Ec2Describer {
    client: aws_sdk_ec2::Client,
}

impl Ec2Describer {
    /// Builds a region-scoped client from the ambient credential chain.
    pub async fn for_region(region: &str) -> Self {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(region.to_owned()))
            .load()
            .await;
        Self {
            client: aws_sdk_ec2::Client::new(&config),
        }
    }
}

#[async_trait]
impl InstanceDescriber for Ec2Describer {
    async fn describe_instance(&self, instance_id: &str) -> Result<Vec<Reservation>, TagEnvError> {
        let response = self
            .client
            .describe_instances()
            .instance_ids(instance_id)
            .send()
            .await
            .map_err(|err| {
                TagEnvError::DescribeInstances(format!("{}", DisplayErrorContext(&err)))
            })?;

        Ok(response
            .reservations()
            .iter()
            .map(|reservation| Reservation {
                instances: reservation
                    .instances()
                    .iter()
                    .map(|instance| Instance {
                        tags: instance
                            .tags()
                            .iter()
                            .filter_map(|tag| match (tag.key(), tag.value()) {
                                (Some(key), Some(value)) => Some(Tag::new(key, value)),
                                _ => None,
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect())
    }
}
