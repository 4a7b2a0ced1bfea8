use std::fs::File;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use plinth_install::{FetchError, Fetcher, LocalFetcher};
use tracing::debug;

/// Downloads `http(s)://` URIs and hands everything else to [`LocalFetcher`].
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .user_agent(format!("plinth/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build http client")?;
        Ok(Self { client })
    }
}

fn is_remote(uri: &str) -> bool { uri.starts_with("https://") || uri.starts_with("http://") }

impl Fetcher for HttpFetcher {
    fn fetch(&self, uri: &str, dest: &Path) -> Result<(), FetchError> {
        if !is_remote(uri) {
            return LocalFetcher.fetch(uri, dest);
        }

        debug!(uri, "downloading");
        let mut response = self.client.get(uri).send()?.error_for_status()?;
        let mut file = File::create(dest)?;
        let bytes = response.copy_to(&mut file)?;
        file.sync_all()?;
        debug!(uri, bytes, "downloaded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_remote() {
        assert!(is_remote("https://example.com/foo.tar.gz"));
        assert!(is_remote("http://localhost:8080/foo.zip"));
        assert!(!is_remote("file:///tmp/foo.zip"));
        assert!(!is_remote("/tmp/foo.zip"));
    }
}
