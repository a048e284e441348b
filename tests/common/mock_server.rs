//! Mock server helpers for the release API and asset downloads

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{REPO, TAG};

/// Serve `{"tag_name": tag}` from the latest-release endpoint
pub async fn mock_latest_release(server: &MockServer, tag: &str) {
    let body = format!(
        "{{\n  \"url\": \"https://api.github.com/repos/{REPO}/releases/1\",\n  \"tag_name\": \"{tag}\",\n  \"draft\": false\n}}"
    );
    Mock::given(method("GET"))
        .and(path(format!("/repos/{REPO}/releases/latest")))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Serve an arbitrary response from the latest-release endpoint
pub async fn mock_latest_release_response(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/repos/{REPO}/releases/latest")))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Path of a release asset under the download base
pub fn asset_path(file_name: &str) -> String {
    format!("/{REPO}/releases/download/{TAG}/{file_name}")
}

/// Serve `content` for a release asset of the default tag
pub async fn mock_asset(server: &MockServer, file_name: &str, content: &[u8]) {
    Mock::given(method("GET"))
        .and(path(asset_path(file_name)))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(content.to_vec()))
        .mount(server)
        .await;
}

/// Serve an archive and a matching `.sha256` sidecar
pub async fn mock_release_assets(server: &MockServer, archive_name: &str, archive: &[u8]) {
    mock_asset(server, archive_name, archive).await;
    let checksum = super::checksum_line(archive, archive_name);
    mock_asset(server, &format!("{archive_name}.sha256"), checksum.as_bytes()).await;
}

/// Fail a release asset download with `status`
pub async fn mock_asset_status(server: &MockServer, file_name: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(asset_path(file_name)))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}
