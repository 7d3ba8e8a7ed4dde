// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Resolve the local EC2 instance's identity and export its tags as shell
//! environment variable assignments.
//!
//! The crate re-exports the building blocks the CLI wires together: the IMDS
//! identity resolver, the retry-wrapped tag fetcher, and the formatting and
//! output helpers.

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod ec2;
pub mod error;
pub mod format;
pub mod identity;
pub mod output;
pub mod retry;
pub mod tags;

pub use ec2::Ec2Describer;
pub use error::TagEnvError;
pub use format::{render_output, render_tags, sanitize_key};
pub use identity::{IdentityInfo, IdentityResolver, ImdsResolver};
pub use output::write_output;
pub use retry::{retry_with_backoff, BackoffConfig};
pub use tags::{flatten_tags, Instance, InstanceDescriber, Reservation, Tag, TagFetcher};
