//! Headless Chrome interceptor (DevTools protocol via `headless_chrome`).
//!
//! One browser process and one isolated browser context per call; nothing is
//! reused between calls. The response observer is registered before
//! navigation starts, so the detail call cannot slip past it.

use base64::Engine as _;
use headless_chrome::protocol::cdp::Network::events::ResponseReceivedEventParams;
use headless_chrome::protocol::cdp::Network::GetResponseBodyReturnObject;
use headless_chrome::{Browser, LaunchOptions};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::capture::{is_target_response, CaptureSlot};
use super::{resolve, Interception, Interceptor, NavigationOutcome};
use crate::config::{BrowserConfig, DyplConfig};
use crate::error::{PipelineError, Result};
use crate::log_sink::LogSink;

/// The handler runs once loading finished, but Chrome may already have evicted
/// the body or report it unavailable; a few short retries cover that.
const BODY_ATTEMPTS: u32 = 3;
const BODY_RETRY_DELAY: Duration = Duration::from_millis(150);

#[derive(Debug, Clone)]
pub struct BrowserInterceptor {
    browser: BrowserConfig,
    user_agent: String,
    target_fragment: String,
}

impl BrowserInterceptor {
    pub fn new(browser: BrowserConfig, user_agent: String, target_fragment: String) -> Self {
        Self {
            browser,
            user_agent,
            target_fragment,
        }
    }

    pub fn from_config(cfg: &DyplConfig) -> Self {
        Self::new(
            cfg.browser.clone(),
            cfg.user_agent.clone(),
            cfg.detail_api_fragment.clone(),
        )
    }

    fn launch(&self) -> Result<Browser> {
        // Keep the idle watchdog above the whole navigation budget.
        let idle = self.browser.navigation_timeout()
            + self.browser.grace_period()
            + Duration::from_secs(30);
        let options = LaunchOptions::default_builder()
            .headless(self.browser.headless)
            .path(self.browser.chrome_path.clone())
            .idle_browser_timeout(idle)
            .build()
            .map_err(|e| PipelineError::Browser(e.to_string()))?;
        Browser::new(options).map_err(|e| PipelineError::Browser(format!("{:#}", e)))
    }

    fn run(&self, browser: &Browser, url: &str, sink: &dyn LogSink) -> Result<Interception> {
        let browser_err = |e: anyhow::Error| PipelineError::Browser(format!("{:#}", e));

        let context = browser.new_context().map_err(browser_err)?;
        let tab = context.new_tab().map_err(browser_err)?;
        let nav_timeout = self.browser.navigation_timeout();
        tab.set_default_timeout(nav_timeout);
        tab.set_user_agent(&self.user_agent, None, None)
            .map_err(browser_err)?;

        let slot = Arc::new(CaptureSlot::new());
        let observer_slot = Arc::clone(&slot);
        let fragment = self.target_fragment.clone();
        tab.register_response_handling(
            "dypl-detail-capture",
            Box::new(
                move |params: ResponseReceivedEventParams,
                      fetch_body: &dyn Fn() -> anyhow::Result<GetResponseBodyReturnObject>| {
                    let response_url = params.response.url.as_str();
                    let status = params.response.status as u32;
                    if !is_target_response(response_url, status, &fragment) {
                        return;
                    }
                    let filled = observer_slot.offer(response_url, || read_body(fetch_body));
                    if filled {
                        tracing::debug!(url = response_url, "detail response captured");
                    }
                },
            ),
        )
        .map_err(browser_err)?;
        sink.info("Browser started; listening for network responses.");

        sink.info(&format!("Navigating to {}", url));
        let started = Instant::now();
        let navigation = tab
            .navigate_to(url)
            .and_then(|t| t.wait_until_navigated())
            .map(|_| ());

        let outcome = match navigation {
            Ok(()) => {
                slot.wait_filled(self.browser.grace_period());
                let final_url = tab.get_url();
                sink.info(&format!("Page loaded, final URL: {}", final_url));
                NavigationOutcome::Settled(final_url)
            }
            Err(_) if started.elapsed() >= nav_timeout => {
                sink.warn("Page load timed out; checking whether the detail response arrived.");
                NavigationOutcome::TimedOut(nav_timeout)
            }
            Err(e) => {
                sink.error(&format!("Navigation failed: {:#}", e));
                NavigationOutcome::Failed(format!("{:#}", e))
            }
        };

        let capture = slot.snapshot();
        match &capture {
            super::Capture::Json { url, .. } => {
                sink.info(&format!("Captured detail response: {}", url))
            }
            super::Capture::Invalid { url, reason } => sink.error(&format!(
                "Detail response {} could not be parsed as JSON: {}",
                url, reason
            )),
            super::Capture::Empty => {}
        }
        resolve(capture, outcome)
    }
}

impl Interceptor for BrowserInterceptor {
    fn intercept(&self, url: &str, sink: &dyn LogSink) -> Result<Interception> {
        let browser = self.launch()?;
        // `browser` is dropped (and Chrome killed) on every path out of here.
        let result = self.run(&browser, url, sink);
        drop(browser);
        sink.info("Browser closed.");
        result
    }
}

fn read_body(
    fetch_body: &dyn Fn() -> anyhow::Result<GetResponseBodyReturnObject>,
) -> std::result::Result<String, String> {
    let mut last_err = String::new();
    for attempt in 0..BODY_ATTEMPTS {
        if attempt > 0 {
            std::thread::sleep(BODY_RETRY_DELAY);
        }
        match fetch_body() {
            Ok(body) => return decode_body(body),
            Err(e) => last_err = format!("{:#}", e),
        }
    }
    Err(format!("response body unavailable: {}", last_err))
}

fn decode_body(body: GetResponseBodyReturnObject) -> std::result::Result<String, String> {
    if !body.base_64_encoded {
        return Ok(body.body);
    }
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(body.body.as_bytes())
        .map_err(|e| format!("invalid base64 body: {}", e))?;
    String::from_utf8(bytes).map_err(|e| format!("body is not UTF-8: {}", e))
}
