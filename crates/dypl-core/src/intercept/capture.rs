//! Single-assignment slot for the intercepted detail response.
//!
//! The browser delivers responses on its own event thread; the interceptor
//! blocks on navigation in the worker thread. The slot is the only state the
//! two share: the first matching response fills it, every later one is ignored.

use serde_json::Value;
use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

/// What the observer saw for the target response.
#[derive(Debug, Clone, PartialEq)]
pub enum Capture {
    /// No matching response yet.
    Empty,
    /// Matching response whose body parsed as JSON.
    Json { url: String, body: Value },
    /// Matching response whose body was unreadable or not JSON.
    Invalid { url: String, reason: String },
}

impl Capture {
    pub fn is_empty(&self) -> bool {
        matches!(self, Capture::Empty)
    }
}

/// True if a response is the detail API call we are waiting for.
pub fn is_target_response(url: &str, status: u32, fragment: &str) -> bool {
    status == 200 && url.contains(fragment)
}

#[derive(Debug)]
pub struct CaptureSlot {
    state: Mutex<Capture>,
    filled: Condvar,
}

impl Default for CaptureSlot {
    fn default() -> Self {
        Self {
            state: Mutex::new(Capture::Empty),
            filled: Condvar::new(),
        }
    }
}

impl CaptureSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offers a matching response. `read_body` is only called when the slot is
    /// still empty, and runs under the lock so two racing matches cannot both
    /// fill it. Returns true if this offer filled the slot.
    pub fn offer<F>(&self, url: &str, read_body: F) -> bool
    where
        F: FnOnce() -> Result<String, String>,
    {
        let mut state = self.state.lock().unwrap();
        if !state.is_empty() {
            return false;
        }
        *state = match read_body() {
            Ok(body) => match serde_json::from_str::<Value>(&body) {
                Ok(json) => Capture::Json {
                    url: url.to_string(),
                    body: json,
                },
                Err(e) => Capture::Invalid {
                    url: url.to_string(),
                    reason: e.to_string(),
                },
            },
            Err(reason) => Capture::Invalid {
                url: url.to_string(),
                reason,
            },
        };
        self.filled.notify_all();
        true
    }

    /// Blocks until the slot is filled or `timeout` elapses. Returns true if filled.
    pub fn wait_filled(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock().unwrap();
        while state.is_empty() {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let (guard, _) = self.filled.wait_timeout(state, deadline - now).unwrap();
            state = guard;
        }
        true
    }

    /// Clone of the current capture. The browser keeps its own handle to the
    /// slot until the tab closes, so the worker reads a copy.
    pub fn snapshot(&self) -> Capture {
        self.state.lock().unwrap().clone()
    }
}
