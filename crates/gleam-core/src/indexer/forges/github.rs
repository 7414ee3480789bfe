use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, header};
use serde::Deserialize;

use super::traits::{AssetInfo, ReleaseInfo, ReleaseSource};

#[derive(Debug, Deserialize)]
struct GithubRelease {
    tag_name: String,
    #[serde(default)]
    assets: Vec<GithubAsset>,
}

#[derive(Debug, Deserialize)]
struct GithubAsset {
    name: String,
    browser_download_url: String,
}

impl From<GithubRelease> for ReleaseInfo {
    fn from(release: GithubRelease) -> Self {
        Self {
            tag_name: release.tag_name,
            assets: release
                .assets
                .into_iter()
                .map(|a| AssetInfo {
                    name: a.name,
                    download_url: a.browser_download_url,
                })
                .collect(),
        }
    }
}

/// Build the HTTP client shared by the listing and the probe.
///
/// GitHub rejects requests without a `User-Agent`, so it is set as a
/// default header rather than per request.
///
/// # Errors
///
/// Returns an error if the client cannot be constructed.
pub fn build_client() -> Result<Client> {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::USER_AGENT,
        header::HeaderValue::from_static(crate::USER_AGENT),
    );

    Ok(Client::builder().default_headers(headers).build()?)
}

/// Releases listing of one GitHub repository.
#[derive(Debug, Clone)]
pub struct GitHubReleases {
    client: Client,
    releases_url: String,
}

impl GitHubReleases {
    /// List releases from `releases_url` using `client`.
    pub fn new(client: Client, releases_url: impl Into<String>) -> Self {
        Self {
            client,
            releases_url: releases_url.into(),
        }
    }
}

#[async_trait]
impl ReleaseSource for GitHubReleases {
    fn key(&self) -> String {
        format!("github:{}", self.releases_url)
    }

    async fn fetch_releases(&self) -> Result<Vec<ReleaseInfo>> {
        let resp = self
            .client
            .get(&self.releases_url)
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", self.releases_url))?;

        if !resp.status().is_success() {
            anyhow::bail!("GitHub API error: {} for {}", resp.status(), self.releases_url);
        }

        let releases: Vec<GithubRelease> = resp
            .json()
            .await
            .context("Failed to decode releases listing")?;

        Ok(releases.into_iter().map(ReleaseInfo::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[tokio::test]
    async fn test_fetch_releases_keeps_order() {
        let mut server = Server::new_async().await;

        let mock_body = r#"[
            {
                "tag_name": "v1.5.0-rc1",
                "prerelease": true,
                "assets": [
                    {
                        "name": "gleam-v1.5.0-rc1-x86_64-apple-darwin.tar.gz",
                        "browser_download_url": "https://github.com/gleam-lang/gleam/releases/download/v1.5.0-rc1/gleam-v1.5.0-rc1-x86_64-apple-darwin.tar.gz"
                    }
                ]
            },
            {
                "tag_name": "v1.4.1"
            }
        ]"#;

        let m = server
            .mock("GET", "/repos/gleam-lang/gleam/releases")
            .match_header("user-agent", crate::USER_AGENT)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(mock_body)
            .create_async()
            .await;

        let source = GitHubReleases::new(
            build_client().unwrap(),
            format!("{}/repos/gleam-lang/gleam/releases", server.url()),
        );
        let releases = source.fetch_releases().await.unwrap();
        m.assert_async().await;

        assert_eq!(releases.len(), 2);
        assert_eq!(releases[0].tag_name, "v1.5.0-rc1");
        assert_eq!(releases[0].assets.len(), 1);
        assert_eq!(
            releases[0].assets[0].name,
            "gleam-v1.5.0-rc1-x86_64-apple-darwin.tar.gz"
        );
        assert_eq!(releases[1].tag_name, "v1.4.1");
        assert!(releases[1].assets.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_releases_error_status() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/releases")
            .with_status(403)
            .with_body(r#"{"message": "API rate limit exceeded"}"#)
            .create_async()
            .await;

        let source = GitHubReleases::new(build_client().unwrap(), format!("{}/releases", server.url()));
        let err = source.fetch_releases().await.unwrap_err();
        assert!(err.to_string().contains("403"));
    }

    #[tokio::test]
    async fn test_fetch_releases_bad_body() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/releases")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let source = GitHubReleases::new(build_client().unwrap(), format!("{}/releases", server.url()));
        assert!(source.fetch_releases().await.is_err());
    }
}
