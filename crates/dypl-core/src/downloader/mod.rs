//! Asset downloader: video and cover, idempotent per destination path.
//!
//! Both assets share one contract: validate arguments, ensure the folder,
//! skip if the final file already exists, otherwise stream into `.part` and
//! rename. Only the URL source, folder, extension and timeout differ.

mod fetch;

pub use fetch::{AssetFetcher, CurlFetcher, FetchRequest, CHUNK_SIZE};

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::DyplConfig;
use crate::error::{PipelineError, Result};
use crate::library::{LibraryLayout, COVER_EXT, VIDEO_EXT};
use crate::log_sink::LogSink;
use crate::storage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Video,
    Cover,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKind::Video => write!(f, "video"),
            AssetKind::Cover => write!(f, "cover"),
        }
    }
}

/// Endpoint and timeouts for building download targets.
#[derive(Debug, Clone)]
pub struct DownloadSettings {
    pub video_endpoint: String,
    pub video_timeout: Duration,
    pub cover_timeout: Duration,
}

impl DownloadSettings {
    pub fn from_config(cfg: &DyplConfig) -> Self {
        Self {
            video_endpoint: cfg.video_endpoint.clone(),
            video_timeout: Duration::from_secs(cfg.video_timeout_secs),
            cover_timeout: Duration::from_secs(cfg.cover_timeout_secs),
        }
    }
}

/// One asset to fetch: where from, where to, and how long to wait.
#[derive(Debug, Clone)]
pub struct DownloadTarget {
    pub asset: AssetKind,
    pub url: String,
    pub dir: PathBuf,
    pub stem: String,
    pub ext: &'static str,
    pub timeout: Duration,
}

impl DownloadTarget {
    pub fn final_path(&self) -> PathBuf {
        self.dir.join(format!("{}.{}", self.stem, self.ext))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetOutcome {
    /// Transferred now; carries bytes written.
    Downloaded { path: PathBuf, bytes: u64 },
    /// File was already present; no network activity.
    AlreadyPresent { path: PathBuf },
}

impl AssetOutcome {
    pub fn path(&self) -> &Path {
        match self {
            AssetOutcome::Downloaded { path, .. } | AssetOutcome::AlreadyPresent { path } => path,
        }
    }
}

/// Builds the play URL for a content locator: `<endpoint>?video_id=<locator>`.
pub fn play_url(endpoint: &str, locator: &str) -> Result<String> {
    let url = url::Url::parse_with_params(endpoint, &[("video_id", locator)]).map_err(|e| {
        PipelineError::DownloadTransport {
            asset: AssetKind::Video,
            reason: format!("invalid video endpoint {}: {}", endpoint, e),
        }
    })?;
    Ok(url.into())
}

/// Video target from an opaque content locator.
pub fn video_target(
    settings: &DownloadSettings,
    layout: &LibraryLayout,
    locator: Option<&str>,
    stem: &str,
) -> Result<DownloadTarget> {
    let locator = locator
        .filter(|l| !l.is_empty())
        .ok_or(PipelineError::MissingArgument("video locator"))?;
    Ok(DownloadTarget {
        asset: AssetKind::Video,
        url: play_url(&settings.video_endpoint, locator)?,
        dir: layout.video_dir(),
        stem: stem.to_string(),
        ext: VIDEO_EXT,
        timeout: settings.video_timeout,
    })
}

/// Cover target from a direct image URL.
pub fn cover_target(
    settings: &DownloadSettings,
    layout: &LibraryLayout,
    cover_url: Option<&str>,
    stem: &str,
) -> Result<DownloadTarget> {
    let url = cover_url
        .filter(|u| !u.is_empty())
        .ok_or(PipelineError::MissingArgument("cover URL"))?;
    Ok(DownloadTarget {
        asset: AssetKind::Cover,
        url: url.to_string(),
        dir: layout.cover_dir(),
        stem: stem.to_string(),
        ext: COVER_EXT,
        timeout: settings.cover_timeout,
    })
}

/// Downloads one asset unless its final file already exists.
///
/// On failure the partially written `.part` file is left on disk.
pub fn download_asset(
    fetcher: &dyn AssetFetcher,
    target: &DownloadTarget,
    sink: &dyn LogSink,
) -> Result<AssetOutcome> {
    if target.url.is_empty() {
        sink.error(&format!("Missing URL for {} download.", target.asset));
        return Err(PipelineError::MissingArgument("download URL"));
    }
    if target.stem.is_empty() {
        sink.error(&format!("Missing filename for {} download.", target.asset));
        return Err(PipelineError::MissingArgument("filename stem"));
    }

    sink.info(&format!("Preparing {} download: {}", target.asset, target.url));
    if storage::ensure_dir(&target.dir)? {
        sink.info(&format!("Created folder {}", target.dir.display()));
    }

    let final_path = target.final_path();
    if final_path.exists() {
        sink.info(&format!(
            "{} already exists, skipping download: {}",
            target.asset,
            final_path.display()
        ));
        return Ok(AssetOutcome::AlreadyPresent { path: final_path });
    }

    let temp = storage::temp_path(&final_path);
    let request = FetchRequest {
        asset: target.asset,
        url: target.url.clone(),
        timeout: target.timeout,
    };
    let bytes = match fetcher.fetch(&request, &temp, sink) {
        Ok(n) => n,
        Err(e) => {
            sink.error(&format!("Error downloading {}: {}", target.asset, e));
            return Err(e);
        }
    };
    storage::finalize(&temp, &final_path)?;
    sink.info(&format!(
        "{} saved to {} ({} bytes)",
        target.asset,
        final_path.display(),
        bytes
    ));
    Ok(AssetOutcome::Downloaded {
        path: final_path,
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log_sink::{LogLevel, MemorySink};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Writes a fixed body and counts calls.
    struct CountingFetcher {
        calls: AtomicUsize,
        body: Vec<u8>,
    }

    impl AssetFetcher for CountingFetcher {
        fn fetch(&self, _req: &FetchRequest, dest: &Path, _sink: &dyn LogSink) -> Result<u64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            std::fs::write(dest, &self.body).unwrap();
            Ok(self.body.len() as u64)
        }
    }

    /// Writes half a body then fails, like a dropped connection.
    struct TruncatingFetcher;

    impl AssetFetcher for TruncatingFetcher {
        fn fetch(&self, req: &FetchRequest, dest: &Path, _sink: &dyn LogSink) -> Result<u64> {
            std::fs::write(dest, b"half").unwrap();
            Err(PipelineError::DownloadTransport {
                asset: req.asset,
                reason: "connection reset".into(),
            })
        }
    }

    fn settings() -> DownloadSettings {
        DownloadSettings::from_config(&DyplConfig::default())
    }

    #[test]
    fn play_url_embeds_locator_as_query() {
        assert_eq!(
            play_url("https://www.douyin.com/aweme/v1/play/", "v0200fg10000abc").unwrap(),
            "https://www.douyin.com/aweme/v1/play/?video_id=v0200fg10000abc"
        );
        assert!(play_url("not a url", "v1").is_err());
    }

    #[test]
    fn targets_use_fixed_folders_and_timeouts() {
        let layout = LibraryLayout::new("/lib");
        let v = video_target(&settings(), &layout, Some("v1"), "A-My Clip").unwrap();
        assert_eq!(v.final_path(), Path::new("/lib/MP4/A-My Clip.mp4"));
        assert_eq!(v.timeout, Duration::from_secs(60));
        let c = cover_target(&settings(), &layout, Some("https://img/cover.jpg"), "A-My Clip")
            .unwrap();
        assert_eq!(c.final_path(), Path::new("/lib/albumArt/A-My Clip.jpg"));
        assert_eq!(c.url, "https://img/cover.jpg");
        assert_eq!(c.timeout, Duration::from_secs(30));
    }

    #[test]
    fn missing_locator_or_cover_fails_fast() {
        let layout = LibraryLayout::new("/lib");
        assert!(matches!(
            video_target(&settings(), &layout, None, "s"),
            Err(PipelineError::MissingArgument(_))
        ));
        assert!(matches!(
            video_target(&settings(), &layout, Some(""), "s"),
            Err(PipelineError::MissingArgument(_))
        ));
        assert!(matches!(
            cover_target(&settings(), &layout, None, "s"),
            Err(PipelineError::MissingArgument(_))
        ));
    }

    #[test]
    fn second_download_skips_network() {
        let dir = tempfile::tempdir().unwrap();
        let layout = LibraryLayout::new(dir.path());
        let fetcher = CountingFetcher {
            calls: AtomicUsize::new(0),
            body: b"mp4 bytes".to_vec(),
        };
        let target = video_target(&settings(), &layout, Some("v1"), "A-My Clip").unwrap();
        let sink = MemorySink::new();

        let first = download_asset(&fetcher, &target, &sink).unwrap();
        assert!(matches!(first, AssetOutcome::Downloaded { bytes: 9, .. }));
        let second = download_asset(&fetcher, &target, &sink).unwrap();
        assert!(matches!(second, AssetOutcome::AlreadyPresent { .. }));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(std::fs::read(second.path()).unwrap(), b"mp4 bytes");
        assert!(sink.contains(LogLevel::Info, "already exists"));
        assert!(sink.contains(LogLevel::Info, "Created folder"));
    }

    #[test]
    fn empty_stem_fails_without_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = CountingFetcher {
            calls: AtomicUsize::new(0),
            body: Vec::new(),
        };
        let target = DownloadTarget {
            asset: AssetKind::Cover,
            url: "https://img/c.jpg".into(),
            dir: dir.path().join("albumArt"),
            stem: String::new(),
            ext: COVER_EXT,
            timeout: Duration::from_secs(1),
        };
        let err = download_asset(&fetcher, &target, &MemorySink::new()).unwrap_err();
        assert!(matches!(err, PipelineError::MissingArgument("filename stem")));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
        assert!(!target.dir.exists());
    }

    #[test]
    fn failed_transfer_leaves_part_file_and_no_final() {
        let dir = tempfile::tempdir().unwrap();
        let layout = LibraryLayout::new(dir.path());
        let target = video_target(&settings(), &layout, Some("v1"), "B-Clip").unwrap();
        let sink = MemorySink::new();
        let err = download_asset(&TruncatingFetcher, &target, &sink).unwrap_err();
        assert!(matches!(err, PipelineError::DownloadTransport { .. }));
        assert!(!target.final_path().exists());
        assert!(storage::temp_path(&target.final_path()).exists());
        assert!(sink.contains(LogLevel::Error, "connection reset"));
    }
}
