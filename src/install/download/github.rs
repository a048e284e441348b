//! GitHub release API interaction

use std::sync::LazyLock;

use log::{debug, info};
use regex::Regex;
use reqwest::StatusCode;

use crate::install::error::InstallError;

/// Matches the first `"tag_name": "<value>"` pair, tolerating whitespace
static TAG_NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""tag_name"\s*:\s*"([^"]*)""#).expect("valid tag_name regex")
});

/// Pull the release tag out of a release API response body
///
/// The body is treated as semi-structured text rather than parsed as JSON,
/// so unrelated fields or formatting changes don't break tag discovery.
pub fn extract_tag_name(body: &str) -> Option<String> {
    TAG_NAME_PATTERN
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|tag| !tag.is_empty())
}

/// Fetch the tag of the latest published release of `repo`
pub async fn latest_tag(
    client: &reqwest::Client,
    api_base: &str,
    repo: &str,
) -> Result<String, InstallError> {
    let url = format!("{}/repos/{}/releases/latest", api_base.trim_end_matches('/'), repo);
    debug!("Querying {url}");

    let lookup_failed = |reason: String| InstallError::ReleaseLookupFailed {
        repo: repo.to_string(),
        reason,
    };

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| lookup_failed(e.to_string()))?;

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        // GitHub answers 404 when a repository has no published release
        return Err(InstallError::NoReleaseFound {
            repo: repo.to_string(),
        });
    }
    if !status.is_success() {
        return Err(lookup_failed(format!("HTTP {status}")));
    }

    let body = response
        .text()
        .await
        .map_err(|e| lookup_failed(e.to_string()))?;
    if body.trim().is_empty() {
        return Err(lookup_failed("empty response body".to_string()));
    }

    let tag = extract_tag_name(&body).ok_or_else(|| InstallError::NoReleaseFound {
        repo: repo.to_string(),
    })?;

    info!("Latest release of {repo} is {tag}");
    Ok(tag)
}
