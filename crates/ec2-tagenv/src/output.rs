// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Output sink: a destination file (overwritten) or standard output.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::error::TagEnvError;

/// Writes the rendered blob to `destination`, or to stdout when `None`.
///
/// File output replaces any previous contents so repeated runs do not
/// accumulate stale variables.
pub fn write_output(destination: Option<&Path>, blob: &str) -> Result<(), TagEnvError> {
    match destination {
        Some(path) => fs::write(path, blob).map_err(|source| TagEnvError::WriteFile {
            path: path.to_owned(),
            source,
        }),
        None => {
            let mut stdout = io::stdout();
            stdout
                .write_all(blob.as_bytes())
                .and_then(|()| stdout.flush())
                .map_err(TagEnvError::WriteStdout)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_file_contents_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tags.env");
        write_output(Some(&path), "REGION=\"us-east-1\"\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "REGION=\"us-east-1\"\n");
    }

    #[test]
    fn overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tags.env");
        fs::write(&path, "STALE=\"yes\"\n").unwrap();
        write_output(Some(&path), "FRESH=\"yes\"\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "FRESH=\"yes\"\n");
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-subdir").join("tags.env");
        let err = write_output(Some(&path), "X=\"1\"\n").unwrap_err();
        assert!(matches!(err, TagEnvError::WriteFile { .. }));
    }
}
