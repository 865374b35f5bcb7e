use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use reqwest::{Client, StatusCode};
use sha1::{Digest, Sha1};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::file_url::file_url_to_path;
use crate::core::http::build_http_client;

/// Fetches repository files over HTTP(S) or from `file:` repositories.
///
/// Every download lands in a uniquely named `.part` file next to its
/// destination and is renamed into place only once complete and verified.
#[derive(Debug, Clone)]
pub struct Downloader {
    client: Client,
}

impl Downloader {
    pub fn new() -> LauncherResult<Self> {
        Ok(Self {
            client: build_http_client()?,
        })
    }

    // ── Single file download ────────────────────────────

    /// Download `url` to `dest`, optionally validating SHA-1.
    ///
    /// Creates parent directories as needed.
    pub async fn download_file(
        &self,
        url: &str,
        dest: &Path,
        sha1_expected: Option<&str>,
    ) -> LauncherResult<()> {
        let partial = self.fetch_partial(url, dest).await?;
        self.commit(url, &partial, dest, sha1_expected).await
    }

    /// Download `url` to `dest`, checking it against the `.sha1` sidecar
    /// published next to it when there is one.
    ///
    /// The sidecar is only requested once the file itself has arrived, so a
    /// repository that lacks the file costs a single request.
    pub async fn download_checked(&self, url: &str, dest: &Path) -> LauncherResult<()> {
        let partial = self.fetch_partial(url, dest).await?;
        let sha1 = self.fetch_sha1(url).await;
        self.commit(url, &partial, dest, sha1.as_deref()).await
    }

    /// Fetch `url` into a fresh `.part` file beside `dest`.
    async fn fetch_partial(&self, url: &str, dest: &Path) -> LauncherResult<PathBuf> {
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| LauncherError::io(parent, e))?;
        }

        let partial = partial_path(dest);
        let written = match file_url_to_path(url) {
            Some(source) => copy_local(&source, &partial).await,
            None => self.stream_http(url, &partial).await,
        };
        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(e);
        }
        Ok(partial)
    }

    /// Verify `partial` and move it to `dest`. Discarded on mismatch.
    async fn commit(
        &self,
        url: &str,
        partial: &Path,
        dest: &Path,
        sha1_expected: Option<&str>,
    ) -> LauncherResult<()> {
        if let Some(expected) = sha1_expected {
            let actual = sha1_file(partial).await?;
            if !actual.eq_ignore_ascii_case(expected) {
                let _ = tokio::fs::remove_file(partial).await;
                return Err(LauncherError::Sha1Mismatch {
                    url: url.to_string(),
                    expected: expected.to_string(),
                    actual,
                });
            }
        }

        tokio::fs::rename(partial, dest)
            .await
            .map_err(|e| LauncherError::io(dest, e))?;

        info!("Downloaded: {}", url);
        Ok(())
    }

    /// Fetch a small text resource. `Ok(None)` when it does not exist.
    pub async fn fetch_text(&self, url: &str) -> LauncherResult<Option<String>> {
        if let Some(path) = file_url_to_path(url) {
            return match tokio::fs::read_to_string(&path).await {
                Ok(text) => Ok(Some(text)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(LauncherError::io(path, e)),
            };
        }

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(LauncherError::DownloadFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(Some(response.text().await?))
    }

    /// Read the `.sha1` sidecar published next to `url`, if any.
    ///
    /// Sidecars sometimes carry the file name after the hash; only the first
    /// token is kept. Unreachable sidecars are treated as absent.
    pub async fn fetch_sha1(&self, url: &str) -> Option<String> {
        let sidecar = format!("{}.sha1", url);
        match self.fetch_text(&sidecar).await {
            Ok(Some(text)) => text
                .split_whitespace()
                .next()
                .filter(|hash| hash.len() == 40)
                .map(str::to_ascii_lowercase),
            Ok(None) => None,
            Err(e) => {
                debug!("Checksum unavailable for {}: {}", url, e);
                None
            }
        }
    }

    async fn stream_http(&self, url: &str, dest: &Path) -> LauncherResult<()> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LauncherError::DownloadFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let mut file = tokio::fs::File::create(dest)
            .await
            .map_err(|e| LauncherError::io(dest, e))?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk)
                .await
                .map_err(|e| LauncherError::io(dest, e))?;
        }
        file.flush().await.map_err(|e| LauncherError::io(dest, e))?;
        Ok(())
    }
}

async fn copy_local(source: &Path, dest: &Path) -> LauncherResult<()> {
    tokio::fs::copy(source, dest)
        .await
        .map_err(|e| LauncherError::io(source, e))?;
    Ok(())
}

fn partial_path(dest: &Path) -> PathBuf {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    dest.with_file_name(format!("{}.{}.part", name, Uuid::new_v4().simple()))
}

/// Hex SHA-1 of a file's contents.
pub async fn sha1_file(path: &Path) -> LauncherResult<String> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| LauncherError::io(path, e))?;
    let mut hasher = Sha1::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::file_url::to_file_url;
    use crate::core::test_support::scratch_dir;

    #[tokio::test]
    async fn copies_from_file_repositories() {
        let scratch = scratch_dir("downloader-copy");
        let dir = scratch.path();
        let source = dir.join("remote").join("lib.jar");
        std::fs::create_dir_all(source.parent().unwrap()).unwrap();
        std::fs::write(&source, b"jar bytes").unwrap();

        let dest = dir.join("local").join("nested").join("lib.jar");
        let downloader = Downloader::new().unwrap();
        downloader
            .download_file(&to_file_url(&source), &dest, None)
            .await
            .unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), b"jar bytes");
        let leftovers: Vec<_> = std::fs::read_dir(dest.parent().unwrap())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().ends_with(".part"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn verifies_sha1_and_discards_mismatches() {
        let scratch = scratch_dir("downloader-sha1");
        let dir = scratch.path();
        let source = dir.join("lib.jar");
        std::fs::write(&source, b"hello").unwrap();
        let downloader = Downloader::new().unwrap();
        let url = to_file_url(&source);

        let good = "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d";
        let dest = dir.join("ok").join("lib.jar");
        downloader.download_file(&url, &dest, Some(good)).await.unwrap();
        assert!(dest.exists());

        let bad = "0000000000000000000000000000000000000000";
        let dest = dir.join("bad").join("lib.jar");
        let err = downloader
            .download_file(&url, &dest, Some(bad))
            .await
            .unwrap_err();
        assert!(matches!(err, LauncherError::Sha1Mismatch { .. }));
        assert!(!dest.exists());
        assert_eq!(std::fs::read_dir(dir.join("bad")).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn reads_sha1_sidecars() {
        let scratch = scratch_dir("downloader-sidecar");
        let dir = scratch.path();
        let source = dir.join("lib.jar");
        std::fs::write(&source, b"hello").unwrap();
        std::fs::write(
            dir.join("lib.jar.sha1"),
            "AAF4C61DDCC5E8A2DABEDE0F3B482CD9AEA9434D  lib.jar\n",
        )
        .unwrap();
        let downloader = Downloader::new().unwrap();

        let sha1 = downloader.fetch_sha1(&to_file_url(&source)).await;
        assert_eq!(
            sha1.as_deref(),
            Some("aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d")
        );
        assert!(downloader
            .fetch_sha1(&to_file_url(&dir.join("other.jar")))
            .await
            .is_none());
    }

    #[tokio::test]
    async fn missing_local_source_is_not_found() {
        let scratch = scratch_dir("downloader-missing");
        let dir = scratch.path();
        let downloader = Downloader::new().unwrap();
        let err = downloader
            .download_file(
                &to_file_url(&dir.join("absent.jar")),
                &dir.join("out.jar"),
                None,
            )
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
    #[tokio::test]
    async fn checked_download_uses_the_sidecar() {
        let scratch = scratch_dir("downloader-checked");
        let dir = scratch.path();
        let downloader = Downloader::new().unwrap();

        let good = dir.join("good.jar");
        std::fs::write(&good, b"hello").unwrap();
        std::fs::write(
            dir.join("good.jar.sha1"),
            "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d",
        )
        .unwrap();
        let dest = dir.join("out").join("good.jar");
        downloader
            .download_checked(&to_file_url(&good), &dest)
            .await
            .unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"hello");

        let tampered = dir.join("tampered.jar");
        std::fs::write(&tampered, b"bye").unwrap();
        std::fs::write(
            dir.join("tampered.jar.sha1"),
            "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d",
        )
        .unwrap();
        let dest = dir.join("out").join("tampered.jar");
        let err = downloader
            .download_checked(&to_file_url(&tampered), &dest)
            .await
            .unwrap_err();
        assert!(matches!(err, LauncherError::Sha1Mismatch { .. }));
        assert!(!dest.exists());

        // A sidecar without its file is still a miss.
        std::fs::write(
            dir.join("orphan.jar.sha1"),
            "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d",
        )
        .unwrap();
        let orphan = dir.join("orphan.jar");
        let err = downloader
            .download_checked(&to_file_url(&orphan), &dir.join("out").join("orphan.jar"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
