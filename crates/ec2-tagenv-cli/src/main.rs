// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

use std::{env, path::PathBuf, process};

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use ec2_tagenv::{
    render_output, write_output, BackoffConfig, Ec2Describer, IdentityInfo, IdentityResolver,
    ImdsResolver, TagFetcher,
};

/// Exports the current EC2 instance's tags as shell environment variable
/// assignments, one `KEY="VALUE"` line per tag, preceded by synthetic
/// `REGION` and `INSTANCE_ID` entries.
#[derive(Parser, Debug)]
#[command(name = "ec2-tagenv", version, about)]
struct Cli {
    /// File to write the environment variables to instead of stdout.
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    file: Option<PathBuf>,
}

#[tokio::main]
pub async fn main() {
    let cli = Cli::parse();

    let log_level = env::var("TAGENV_LOG_LEVEL")
        .map(|val| val.to_lowercase())
        .unwrap_or("info".to_string());
    let env_filter = format!("hyper=off,rustls=off,{}", log_level);

    #[allow(clippy::expect_used)]
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_new(env_filter).expect("could not parse log level in configuration"),
        )
        .with_level(true)
        .with_thread_names(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .with_file(false)
        .with_target(true)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();

    #[allow(clippy::expect_used)]
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let identity = resolve_identity().await;
    info!(
        region = %identity.region,
        instance_id = %identity.instance_id,
        "resolved instance identity"
    );

    let describer = Ec2Describer::for_region(&identity.region).await;
    let fetcher = TagFetcher::new(Box::new(describer), BackoffConfig::default());
    let tags = match fetcher.fetch(&identity.instance_id).await {
        Ok(tags) => tags,
        Err(err) => {
            error!("unable to fetch instance tags: {err}");
            process::exit(1);
        }
    };

    let blob = render_output(&identity, &tags);
    if let Err(err) = write_output(cli.file.as_deref(), &blob) {
        error!("{err}");
        process::exit(1);
    }
}

/// Builds the IMDS resolver (honoring the `TAGENV_METADATA_URL` override) and
/// resolves the instance identity, degrading to the empty identity when the
/// metadata service is unavailable.
async fn resolve_identity() -> IdentityInfo {
    let resolver = match env::var("TAGENV_METADATA_URL") {
        Ok(url) => ImdsResolver::with_base_url(url),
        Err(_) => ImdsResolver::new(),
    };
    match resolver {
        Ok(resolver) => resolver.resolve().await,
        Err(err) => {
            warn!("unable to build metadata client: {err}");
            IdentityInfo::default()
        }
    }
}
