//! Detail API interception: turn a share link into the detail payload.
//!
//! The page behind a share link fetches its metadata from a background API
//! call. Rather than reproducing the signing that call needs, a real browser
//! loads the page and the response is read off the wire.
//!
//! Lifecycle of one call: `Idle → Navigating → {Captured | TimedOut | Errored} → Closed`.
//! `Captured` may happen at any point while navigating and is kept even if
//! navigation later times out; `resolve` encodes that precedence.

mod browser;
mod capture;

pub use browser::BrowserInterceptor;
pub use capture::{is_target_response, Capture, CaptureSlot};

use serde_json::Value;
use std::time::Duration;

use crate::error::{PipelineError, Result};
use crate::log_sink::LogSink;

/// Captured detail payload plus the page URL after redirects.
#[derive(Debug, Clone, PartialEq)]
pub struct Interception {
    pub detail: Value,
    /// Present only when navigation settled before the timeout.
    pub final_url: Option<String>,
}

/// Resolves a URL into the detail payload. No retries; callers decide.
pub trait Interceptor: Send + Sync {
    fn intercept(&self, url: &str, sink: &dyn LogSink) -> Result<Interception>;
}

/// How navigation ended, independent of what the observer captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Page loaded; carries the final URL.
    Settled(String),
    /// Navigation hit its budget.
    TimedOut(Duration),
    /// Navigation failed for another reason.
    Failed(String),
}

/// Combines the capture and the navigation outcome into the call result.
///
/// A JSON capture always wins; only "nothing captured" looks at navigation.
pub fn resolve(capture: Capture, navigation: NavigationOutcome) -> Result<Interception> {
    match capture {
        Capture::Json { body, .. } => Ok(Interception {
            detail: body,
            final_url: match navigation {
                NavigationOutcome::Settled(url) => Some(url),
                _ => None,
            },
        }),
        Capture::Invalid { url, reason } => Err(PipelineError::InterceptionParse { url, reason }),
        Capture::Empty => Err(match navigation {
            NavigationOutcome::TimedOut(after) => PipelineError::InterceptionTimeout(after),
            NavigationOutcome::Failed(reason) => PipelineError::Navigation(reason),
            NavigationOutcome::Settled(_) => PipelineError::DetailNotCaptured,
        }),
    }
}
