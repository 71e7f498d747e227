//! Streamed single GET to a local file (libcurl).
//!
//! The body is written to disk chunk by chunk as it arrives; nothing is
//! buffered beyond curl's receive buffer.

use std::cell::Cell;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::str;
use std::time::Duration;

use super::AssetKind;
use crate::error::{PipelineError, Result};
use crate::log_sink::LogSink;

/// Receive buffer size; bounds each chunk handed to the write callback.
pub const CHUNK_SIZE: usize = 8 * 1024;

/// Everything a fetcher needs for one transfer.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub asset: AssetKind,
    pub url: String,
    /// Overall transfer timeout.
    pub timeout: Duration,
}

/// Performs the network transfer for one asset into `dest`.
///
/// Implementations must not retry and must return the number of bytes written.
pub trait AssetFetcher: Send + Sync {
    fn fetch(&self, request: &FetchRequest, dest: &Path, sink: &dyn LogSink) -> Result<u64>;
}

#[derive(Debug, Clone)]
pub struct CurlFetcher {
    user_agent: String,
}

impl CurlFetcher {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
        }
    }
}

impl AssetFetcher for CurlFetcher {
    fn fetch(&self, request: &FetchRequest, dest: &Path, sink: &dyn LogSink) -> Result<u64> {
        let asset = request.asset;
        let transport = |e: curl::Error| PipelineError::DownloadTransport {
            asset,
            reason: e.to_string(),
        };

        let mut easy = curl::easy::Easy::new();
        easy.url(&request.url).map_err(transport)?;
        easy.useragent(&self.user_agent).map_err(transport)?;
        easy.follow_location(true).map_err(transport)?;
        easy.max_redirections(10).map_err(transport)?;
        easy.fail_on_error(true).map_err(transport)?;
        easy.buffer_size(CHUNK_SIZE).map_err(transport)?;
        easy.connect_timeout(request.timeout.min(Duration::from_secs(15)))
            .map_err(transport)?;
        easy.timeout(request.timeout).map_err(transport)?;

        let content_length: Cell<Option<u64>> = Cell::new(None);
        let mut file: Option<File> = None;
        let mut written: u64 = 0;
        let mut write_err: Option<std::io::Error> = None;

        let performed = {
            let mut transfer = easy.transfer();
            transfer
                .header_function(|data| {
                    if let Ok(line) = str::from_utf8(data) {
                        content_length.set(observe_header(content_length.get(), line));
                    }
                    true
                })
                .map_err(transport)?;
            transfer
                .write_function(|data| {
                    if file.is_none() {
                        announce_size(sink, asset, content_length.get());
                        match File::create(dest) {
                            Ok(f) => file = Some(f),
                            Err(e) => {
                                write_err = Some(e);
                                return Ok(0); // abort transfer
                            }
                        }
                    }
                    if let Some(f) = file.as_mut() {
                        if let Err(e) = f.write_all(data) {
                            write_err = Some(e);
                            return Ok(0);
                        }
                    }
                    written += data.len() as u64;
                    Ok(data.len())
                })
                .map_err(transport)?;
            transfer.perform()
        };

        if let Some(e) = write_err {
            return Err(PipelineError::io(dest, e));
        }
        if let Err(e) = performed {
            if e.is_http_returned_error() {
                let status = easy.response_code().unwrap_or(0);
                return Err(PipelineError::DownloadHttp { asset, status });
            }
            return Err(transport(e));
        }

        // An empty 2xx body never reaches the write callback.
        let file = match file {
            Some(f) => f,
            None => File::create(dest).map_err(|e| PipelineError::io(dest, e))?,
        };
        file.sync_all().map_err(|e| PipelineError::io(dest, e))?;
        Ok(written)
    }
}

fn announce_size(sink: &dyn LogSink, asset: AssetKind, content_length: Option<u64>) {
    match content_length {
        Some(len) => sink.info(&format!(
            "Receiving {}: {:.2} MB",
            asset,
            len as f64 / 1024.0 / 1024.0
        )),
        None => sink.info(&format!("Receiving {}: size unknown", asset)),
    }
}

/// Content length as known after `line`. Each redirect hop starts with its own
/// status line, which forgets the previous hop's length.
fn observe_header(current: Option<u64>, line: &str) -> Option<u64> {
    if line.starts_with("HTTP/") {
        return None;
    }
    parse_content_length(line).or(current)
}

/// Parses a `Content-Length` header line.
fn parse_content_length(line: &str) -> Option<u64> {
    let (name, value) = line.split_once(':')?;
    if !name.trim().eq_ignore_ascii_case("content-length") {
        return None;
    }
    value.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_length_header() {
        assert_eq!(parse_content_length("Content-Length: 1048576\r\n"), Some(1_048_576));
        assert_eq!(parse_content_length("content-length:42"), Some(42));
        assert_eq!(parse_content_length("Content-Type: video/mp4"), None);
        assert_eq!(parse_content_length("HTTP/1.1 200 OK"), None);
        assert_eq!(parse_content_length("Content-Length: nope"), None);
    }

    fn length_after(lines: &[&str]) -> Option<u64> {
        lines.iter().fold(None, |len, line| observe_header(len, line))
    }

    #[test]
    fn redirect_hop_length_is_forgotten() {
        let chunked_after_redirect = [
            "HTTP/1.1 302 Found\r\n",
            "Location: https://cdn.example.com/v.mp4\r\n",
            "Content-Length: 154\r\n",
            "\r\n",
            "HTTP/1.1 200 OK\r\n",
            "Transfer-Encoding: chunked\r\n",
            "\r\n",
        ];
        assert_eq!(length_after(&chunked_after_redirect), None);

        let sized_after_redirect = [
            "HTTP/1.1 302 Found\r\n",
            "Content-Length: 154\r\n",
            "HTTP/2 200\r\n",
            "content-length: 4096\r\n",
            "content-type: video/mp4\r\n",
        ];
        assert_eq!(length_after(&sized_after_redirect), Some(4096));
    }
}
