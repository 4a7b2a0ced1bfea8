use std::fs;
use std::io;
use std::path::Path;

/// Error type fetchers report. Transports differ too much for a closed enum.
pub type FetchError = Box<dyn std::error::Error + Send + Sync>;

/// Produces a local file from an artifact URI.
///
/// The installer calls this once per install with a destination inside its
/// private staging area.
pub trait Fetcher {
    fn fetch(&self, uri: &str, dest: &Path) -> Result<(), FetchError>;
}

impl<F: Fetcher + ?Sized> Fetcher for &F {
    fn fetch(&self, uri: &str, dest: &Path) -> Result<(), FetchError> { (**self).fetch(uri, dest) }
}

impl<F: Fetcher + ?Sized> Fetcher for Box<F> {
    fn fetch(&self, uri: &str, dest: &Path) -> Result<(), FetchError> { (**self).fetch(uri, dest) }
}

/// Copies `file://` URIs and plain paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFetcher;

impl LocalFetcher {
    /// The local path a URI refers to, if it is a local one.
    pub fn local_path(uri: &str) -> Option<&Path> {
        if let Some(path) = uri.strip_prefix("file://") {
            return Some(Path::new(path));
        }
        match uri.split_once("://") {
            Some(_) => None,
            None => Some(Path::new(uri)),
        }
    }
}

impl Fetcher for LocalFetcher {
    fn fetch(&self, uri: &str, dest: &Path) -> Result<(), FetchError> {
        let path = Self::local_path(uri).ok_or_else(|| {
            io::Error::new(io::ErrorKind::Unsupported, format!("unsupported uri scheme: {uri}"))
        })?;
        fs::copy(path, dest).map_err(|e| io::Error::new(e.kind(), format!("{}: {e}", path.display())))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_local_path() {
        assert_eq!(LocalFetcher::local_path("file:///tmp/a.zip"), Some(Path::new("/tmp/a.zip")));
        assert_eq!(LocalFetcher::local_path("./a.zip"), Some(Path::new("./a.zip")));
        assert_eq!(LocalFetcher::local_path("https://example.com/a.zip"), None);
    }

    #[test]
    fn test_fetch_copies() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("artifact");
        let dest = dir.path().join("fetched");
        fs::write(&src, "payload").unwrap();

        LocalFetcher
            .fetch(&format!("file://{}", src.display()), &dest)
            .unwrap();
        assert_eq!(fs::read_to_string(dest).unwrap(), "payload");
    }

    #[test]
    fn test_fetch_rejects_remote() {
        let dir = tempdir().unwrap();
        assert!(LocalFetcher
            .fetch("https://example.com/a.zip", &dir.path().join("x"))
            .is_err());
    }
}
