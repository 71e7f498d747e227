//! The two user-facing operations: parse a share text, download a parsed item.
//!
//! Both are long-running and blocking; run them off the presentation thread
//! (see `worker::Dispatcher`). Within one call everything is sequential:
//! interception before parsing, video before cover, both before the playlist.

use std::sync::Arc;

use crate::config::DyplConfig;
use crate::detail::VideoDetails;
use crate::downloader::{
    self, cover_target, video_target, AssetFetcher, AssetOutcome, CurlFetcher, DownloadSettings,
};
use crate::error::{PipelineError, Result};
use crate::intercept::{BrowserInterceptor, Interceptor};
use crate::library::LibraryLayout;
use crate::link::extract_link;
use crate::log_sink::LogSink;
use crate::naming::{filename_stem, to_playlist_path};
use crate::playlist::{self, AppendOutcome, PlaylistEntry};

/// Input of the download step: metadata plus the user's (possibly edited) names.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub author: String,
    pub title: String,
    pub details: VideoDetails,
}

/// Per-step results of one download call.
#[derive(Debug)]
pub struct DownloadReport {
    pub stem: String,
    pub video: Result<AssetOutcome>,
    pub cover: Result<AssetOutcome>,
    /// `None` when the playlist step did not run (an asset failed).
    pub playlist: Option<Result<AppendOutcome>>,
}

impl DownloadReport {
    /// Both assets are on disk and the playlist holds the entry.
    pub fn is_success(&self) -> bool {
        self.video.is_ok() && self.cover.is_ok() && matches!(self.playlist, Some(Ok(_)))
    }
}

#[derive(Clone)]
pub struct Pipeline {
    layout: LibraryLayout,
    settings: DownloadSettings,
    interceptor: Arc<dyn Interceptor>,
    fetcher: Arc<dyn AssetFetcher>,
}

impl Pipeline {
    pub fn new(
        layout: LibraryLayout,
        settings: DownloadSettings,
        interceptor: Arc<dyn Interceptor>,
        fetcher: Arc<dyn AssetFetcher>,
    ) -> Self {
        Self {
            layout,
            settings,
            interceptor,
            fetcher,
        }
    }

    /// Pipeline with the headless-browser interceptor and curl fetcher.
    pub fn from_config(cfg: &DyplConfig, layout: LibraryLayout) -> Self {
        Self::new(
            layout,
            DownloadSettings::from_config(cfg),
            Arc::new(BrowserInterceptor::from_config(cfg)),
            Arc::new(CurlFetcher::new(cfg.user_agent.clone())),
        )
    }

    /// Share text → metadata.
    pub fn parse(&self, share_text: &str, sink: &dyn LogSink) -> Result<VideoDetails> {
        let url = match extract_link(share_text) {
            Ok(u) => u,
            Err(e) => {
                sink.error("No URL found in the text.");
                return Err(e);
            }
        };
        sink.info(&format!("Extracted URL: {}", url));

        let interception = self.interceptor.intercept(url, sink)?;
        let details = VideoDetails::from_detail(&interception.detail, interception.final_url)?;
        sink.info(&format!(
            "Parsed: author '{}', title '{}'",
            details.author, details.title
        ));
        Ok(details)
    }

    /// Downloads video and cover, then records the playlist entry.
    ///
    /// Only empty author/title is an `Err`; asset and playlist failures are
    /// reported per step inside the `DownloadReport`.
    pub fn download(&self, request: &DownloadRequest, sink: &dyn LogSink) -> Result<DownloadReport> {
        if request.author.trim().is_empty() {
            sink.error("Author must not be empty.");
            return Err(PipelineError::MissingArgument("author"));
        }
        if request.title.trim().is_empty() {
            sink.error("Title must not be empty.");
            return Err(PipelineError::MissingArgument("title"));
        }
        let stem = filename_stem(&request.author, &request.title)
            .ok_or(PipelineError::MissingArgument("filename stem"))?;
        sink.info(&format!("Using filename: {}", stem));

        let details = &request.details;
        let video = video_target(&self.settings, &self.layout, details.video_uri.as_deref(), &stem)
            .and_then(|t| downloader::download_asset(self.fetcher.as_ref(), &t, sink));
        if let Err(e) = &video {
            if matches!(e, PipelineError::MissingArgument(_)) {
                sink.error(&format!("Cannot download video: {}", e));
            }
        }
        let cover = cover_target(&self.settings, &self.layout, details.cover_url.as_deref(), &stem)
            .and_then(|t| downloader::download_asset(self.fetcher.as_ref(), &t, sink));
        if let Err(e) = &cover {
            if matches!(e, PipelineError::MissingArgument(_)) {
                sink.error(&format!("Cannot download cover: {}", e));
            }
        }

        let playlist = if video.is_ok() && cover.is_ok() {
            let entry = PlaylistEntry::new(
                &request.title,
                &request.author,
                &to_playlist_path(&LibraryLayout::relative_video_path(&stem)),
                &to_playlist_path(&LibraryLayout::relative_cover_path(&stem)),
                Some(&details.description),
            );
            Some(playlist::append_entry(&self.layout.playlist_path(), &entry, sink))
        } else {
            sink.warn("Skipping playlist update: not every asset was downloaded.");
            None
        };

        let report = DownloadReport {
            stem,
            video,
            cover,
            playlist,
        };
        if report.is_success() {
            sink.info("All tasks finished.");
        }
        Ok(report)
    }
}
