// chain-porter-clients/src/artifact.rs
// ============================================================================
// Module: Artifact Source Loader
// Description: Explicitly tagged local-path and remote-url file loading.
// Purpose: Resolve upload sources without guessing at string shapes.
// Dependencies: reqwest, serde
// ============================================================================

//! ## Overview
//! Upload sources carry an explicit `kind` tag instead of being sniffed from
//! the string value, so a path that happens to parse as a URL is never
//! misrouted. Local paths read from the filesystem; remote URLs fetch over a
//! bounded HTTP client with the shared size limit applied.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::http::MAX_RESPONSE_BYTES;
use crate::http::build_client;
use crate::http::read_response_limited;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Timeout for remote artifact fetches in milliseconds.
const FETCH_TIMEOUT_MS: u64 = 30_000;
/// User agent for remote artifact fetches.
const FETCH_USER_AGENT: &str = "chain-porter/0.1";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Artifact loading errors.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// Local file read failure.
    #[error("artifact read failed: {0}")]
    Read(String),
    /// Remote fetch failure.
    #[error("artifact fetch failed: {0}")]
    Fetch(String),
    /// Source value is not usable for its declared kind.
    #[error("artifact source invalid: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Source
// ============================================================================

/// Explicitly tagged file source for uploads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ArtifactSource {
    /// Read the file from the local filesystem.
    LocalPath(PathBuf),
    /// Fetch the file from a remote http(s) URL.
    RemoteUrl(String),
}

impl ArtifactSource {
    /// Loads the artifact bytes according to the declared kind.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError`] when the source is invalid or the load
    /// fails.
    pub fn load(&self) -> Result<Vec<u8>, ArtifactError> {
        match self {
            Self::LocalPath(path) => {
                if path.as_os_str().is_empty() {
                    return Err(ArtifactError::Invalid("local path must be non-empty".to_string()));
                }
                fs::read(path).map_err(|err| ArtifactError::Read(err.to_string()))
            }
            Self::RemoteUrl(raw) => {
                let url = Url::parse(raw)
                    .map_err(|_| ArtifactError::Invalid(format!("not a valid URL: {raw}")))?;
                if url.scheme() != "http" && url.scheme() != "https" {
                    return Err(ArtifactError::Invalid(format!(
                        "unsupported URL scheme: {}",
                        url.scheme()
                    )));
                }
                fetch_remote(url.as_str())
            }
        }
    }
}

/// Fetches remote artifact bytes with the shared size limit.
fn fetch_remote(url: &str) -> Result<Vec<u8>, ArtifactError> {
    let client =
        build_client(FETCH_TIMEOUT_MS, FETCH_USER_AGENT).map_err(ArtifactError::Fetch)?;
    let mut response =
        client.get(url).send().map_err(|err| ArtifactError::Fetch(err.to_string()))?;
    if !response.status().is_success() {
        return Err(ArtifactError::Fetch(format!("{url} returned {}", response.status())));
    }
    read_response_limited(&mut response, MAX_RESPONSE_BYTES).map_err(ArtifactError::Fetch)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions.")]

    use std::io::Write;

    use super::ArtifactError;
    use super::ArtifactSource;

    #[test]
    fn tagged_form_decodes_local_path() {
        let source: ArtifactSource =
            serde_json::from_str(r#"{"kind": "local_path", "value": "/tmp/a.txt"}"#).unwrap();
        assert_eq!(source, ArtifactSource::LocalPath("/tmp/a.txt".into()));
    }

    #[test]
    fn tagged_form_decodes_remote_url() {
        let source: ArtifactSource =
            serde_json::from_str(r#"{"kind": "remote_url", "value": "https://example.com/a"}"#)
                .unwrap();
        assert_eq!(source, ArtifactSource::RemoteUrl("https://example.com/a".to_string()));
    }

    #[test]
    fn untagged_value_is_rejected() {
        assert!(serde_json::from_str::<ArtifactSource>(r#""/tmp/a.txt""#).is_err());
    }

    #[test]
    fn url_shaped_local_path_stays_local() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"payload").unwrap();
        let source = ArtifactSource::LocalPath(file.path().to_path_buf());
        assert_eq!(source.load().unwrap(), b"payload");
    }

    #[test]
    fn remote_url_rejects_non_http_scheme() {
        let source = ArtifactSource::RemoteUrl("ftp://example.com/a".to_string());
        assert!(matches!(source.load(), Err(ArtifactError::Invalid(_))));
    }

    #[test]
    fn missing_local_file_is_a_read_error() {
        let source = ArtifactSource::LocalPath("/nonexistent/chain-porter-test".into());
        assert!(matches!(source.load(), Err(ArtifactError::Read(_))));
    }
}
