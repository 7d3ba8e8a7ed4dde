// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::io;
use std::path::PathBuf;

/// Errors that can occur while resolving, fetching, or exporting instance tags.
#[derive(Debug, thiserror::Error)]
pub enum TagEnvError {
    /// Transport-level issue (DNS, TLS, socket, etc.) talking to the metadata service.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The metadata service answered but the response was unusable.
    #[error("metadata service error: {0}")]
    Metadata(String),

    /// The describe-instances control-plane call failed.
    #[error("describe-instances request failed: {0}")]
    DescribeInstances(String),

    /// The destination file could not be written.
    #[error("failed to write output file {}: {source}", path.display())]
    WriteFile { path: PathBuf, source: io::Error },

    /// Standard output could not be written.
    #[error("failed to write to stdout: {0}")]
    WriteStdout(#[source] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = TagEnvError::DescribeInstances("throttled".to_string());
        assert_eq!(
            error.to_string(),
            "describe-instances request failed: throttled"
        );
    }

    #[test]
    fn test_write_file_display_includes_path() {
        let error = TagEnvError::WriteFile {
            path: PathBuf::from("/etc/tags.env"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let rendered = error.to_string();
        assert!(rendered.contains("/etc/tags.env"));
        assert!(rendered.contains("denied"));
    }
}
