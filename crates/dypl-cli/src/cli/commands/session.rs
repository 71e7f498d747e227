//! Runs pipeline operations on the worker and prints their log stream.

use anyhow::{anyhow, bail, Result};
use dypl_core::config::DyplConfig;
use dypl_core::detail::VideoDetails;
use dypl_core::downloader::AssetOutcome;
use dypl_core::library::LibraryLayout;
use dypl_core::pipeline::{DownloadReport, DownloadRequest, Pipeline};
use dypl_core::playlist::AppendOutcome;
use dypl_core::worker::{Dispatcher, WorkerEvent};
use std::sync::mpsc::Receiver;
use std::thread::JoinHandle;

pub struct Session {
    dispatcher: Dispatcher,
    events: Receiver<WorkerEvent>,
}

impl Session {
    pub fn new(cfg: &DyplConfig, layout: LibraryLayout) -> Self {
        let (dispatcher, events) = Dispatcher::new(Pipeline::from_config(cfg, layout));
        Self { dispatcher, events }
    }

    pub fn parse(&self, text: &str) -> Result<VideoDetails> {
        let handle = self.dispatcher.submit_parse(text.to_string())?;
        match self.drain(handle)? {
            WorkerEvent::Parsed(result) => Ok(result?),
            other => bail!("unexpected worker event: {:?}", other),
        }
    }

    pub fn download(&self, request: DownloadRequest) -> Result<DownloadReport> {
        let handle = self.dispatcher.submit_download(request)?;
        match self.drain(handle)? {
            WorkerEvent::Downloaded(result) => Ok(result?),
            other => bail!("unexpected worker event: {:?}", other),
        }
    }

    /// Prints log lines until the completion event, then joins the worker.
    fn drain(&self, handle: JoinHandle<()>) -> Result<WorkerEvent> {
        let done = loop {
            match self.events.recv() {
                Ok(WorkerEvent::Log(line)) => eprintln!("{}", line),
                Ok(event) => break event,
                Err(_) => bail!("worker exited without reporting a result"),
            }
        };
        handle
            .join()
            .map_err(|_| anyhow!("worker thread panicked"))?;
        Ok(done)
    }
}

/// Builds a download request; flags override the parsed names.
pub fn request_from(
    details: VideoDetails,
    author: Option<String>,
    title: Option<String>,
) -> DownloadRequest {
    DownloadRequest {
        author: author.unwrap_or_else(|| details.author.clone()),
        title: title.unwrap_or_else(|| details.title.clone()),
        details,
    }
}

pub fn print_details(details: &VideoDetails) {
    println!("author: {}", details.author);
    println!("title:  {}", details.title);
    if let Some(id) = &details.aweme_id {
        println!("id:     {}", id);
    }
}

/// Prints one line per step and fails unless every step succeeded.
pub fn finish_report(report: &DownloadReport) -> Result<()> {
    println!("video:    {}", describe_asset(&report.video));
    println!("cover:    {}", describe_asset(&report.cover));
    let playlist = match &report.playlist {
        None => "skipped".to_string(),
        Some(Ok(AppendOutcome::Appended { total })) => format!("added ({} entries)", total),
        Some(Ok(AppendOutcome::Duplicate)) => "already listed".to_string(),
        Some(Err(e)) => format!("failed: {}", e),
    };
    println!("playlist: {}", playlist);
    if !report.is_success() {
        bail!("download of '{}' did not complete", report.stem);
    }
    Ok(())
}

fn describe_asset(outcome: &dypl_core::Result<AssetOutcome>) -> String {
    match outcome {
        Ok(AssetOutcome::Downloaded { path, bytes }) => {
            format!("{} ({} bytes)", path.display(), bytes)
        }
        Ok(AssetOutcome::AlreadyPresent { path }) => format!("{} (already present)", path.display()),
        Err(e) => format!("failed: {}", e),
    }
}
