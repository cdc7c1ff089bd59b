//! WebDriver HTTP client.
//!
//! Talks to a chromedriver or geckodriver endpoint over the W3C WebDriver
//! protocol. Waits are implemented by polling, bounded by the timeout the
//! caller passes in.

use std::path::Path;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::RequestBuilder;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tokio::time::Instant;
use tracing::debug;

use crate::driver::{Action, Browser, DriverError, Matcher, Session};

use super::locator::locate;
use super::types::{
    ElementRef, Envelope, ErrorValue, ExecuteScript, FindElements, NavigateTo, NewSession,
    PageActivity, ReadyState, SendKeys, Timeouts,
};

/// Default interval between polls while waiting for an element.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// How long the page must stop starting new resource loads to count as idle.
const QUIET_PERIOD: Duration = Duration::from_millis(500);

/// Reports document state and how many resources the page has requested.
const ACTIVITY_SCRIPT: &str = "return {readyState: document.readyState, \
     resources: performance.getEntriesByType('resource').length};";

/// Configuration for the WebDriver client.
#[derive(Debug, Clone)]
pub struct WebDriverConfig {
    /// Endpoint URL, e.g. `http://localhost:9515`
    pub base_url: String,
    /// Run the browser without a window
    pub headless: bool,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
    /// Interval between element polls
    pub poll_interval: Duration,
}

impl WebDriverConfig {
    /// Create a new config for the given endpoint.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            headless: true,
            timeout_secs: 120,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Show or hide the browser window.
    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set HTTP request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the element polling interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Capabilities sent when creating a session.
    ///
    /// Pages are considered loaded once the DOM is parsed (`eager`), which
    /// is all the booking grid needs before we start polling for slots.
    pub fn capabilities(&self) -> Value {
        let (chrome_args, firefox_args): (Vec<&str>, Vec<&str>) = if self.headless {
            (vec!["--headless=new", "--no-sandbox"], vec!["-headless"])
        } else {
            (vec![], vec![])
        };

        json!({
            "capabilities": {
                "alwaysMatch": {
                    "pageLoadStrategy": "eager",
                    "goog:chromeOptions": { "args": chrome_args },
                    "moz:firefoxOptions": { "args": firefox_args },
                }
            }
        })
    }
}

/// Browser backed by a WebDriver endpoint.
#[derive(Debug, Clone)]
pub struct WebDriverBrowser {
    http: reqwest::Client,
    config: WebDriverConfig,
}

impl WebDriverBrowser {
    /// Create a new client with the given configuration.
    pub fn new(config: WebDriverConfig) -> Result<Self, DriverError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { http, config })
    }
}

impl Browser for WebDriverBrowser {
    type Session = WebDriverSession;

    async fn open_session(&self) -> Result<WebDriverSession, DriverError> {
        let url = format!("{}/session", self.config.base_url);
        let created: NewSession =
            send(self.http.post(&url).json(&self.config.capabilities())).await?;

        debug!(session = %created.session_id, "WebDriver session started");

        Ok(WebDriverSession {
            http: self.http.clone(),
            base: format!("{}/session/{}", self.config.base_url, created.session_id),
            poll_interval: self.config.poll_interval,
        })
    }
}

/// One WebDriver session.
#[derive(Debug)]
pub struct WebDriverSession {
    http: reqwest::Client,
    /// `{endpoint}/session/{id}`
    base: String,
    poll_interval: Duration,
}

impl WebDriverSession {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, DriverError> {
        send(self.http.get(format!("{}{}", self.base, path))).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, DriverError> {
        send(self.http.post(format!("{}{}", self.base, path)).json(body)).await
    }

    /// All elements matching `matcher`, in document order.
    async fn find_all(&self, matcher: &Matcher) -> Result<Vec<ElementRef>, DriverError> {
        let locator = locate(matcher);
        self.post(
            "/elements",
            &FindElements {
                using: locator.using,
                value: &locator.value,
            },
        )
        .await
    }

    /// First matching element that is displayed.
    async fn find_visible(&self, matcher: &Matcher) -> Result<Option<ElementRef>, DriverError> {
        for element in self.find_all(matcher).await? {
            match self
                .get::<bool>(&format!("/element/{}/displayed", element.id))
                .await
            {
                Ok(true) => return Ok(Some(element)),
                Ok(false) => {}
                // The element may have been replaced between lookup and check.
                Err(DriverError::WebDriver { .. }) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(None)
    }

    async fn perform(&self, element: &ElementRef, action: &Action) -> Result<(), DriverError> {
        match action {
            Action::Click => {
                let _: Value = self
                    .post(&format!("/element/{}/click", element.id), &json!({}))
                    .await?;
            }
            Action::Fill(text) => {
                let _: Value = self
                    .post(&format!("/element/{}/clear", element.id), &json!({}))
                    .await?;
                let _: Value = self
                    .post(
                        &format!("/element/{}/value", element.id),
                        &SendKeys { text },
                    )
                    .await?;
            }
        }
        Ok(())
    }

    async fn page_activity(&self) -> Result<PageActivity, DriverError> {
        self.post(
            "/execute/sync",
            &ExecuteScript {
                script: ACTIVITY_SCRIPT,
                args: Vec::new(),
            },
        )
        .await
    }
}

impl Session for WebDriverSession {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), DriverError> {
        let _: Value = self
            .post(
                "/timeouts",
                &Timeouts {
                    page_load: timeout.as_millis() as u64,
                },
            )
            .await?;

        let result: Result<Value, DriverError> = self.post("/url", &NavigateTo { url }).await;
        match result {
            Ok(_) => Ok(()),
            Err(DriverError::WebDriver { error, message, .. }) => Err(DriverError::Navigation {
                url: url.to_string(),
                message: format!("{error}: {message}"),
            }),
            Err(e) => Err(e),
        }
    }

    async fn current_url(&mut self) -> Result<String, DriverError> {
        self.get("/url").await
    }

    async fn act(
        &mut self,
        matcher: &Matcher,
        action: &Action,
        timeout: Duration,
    ) -> Result<(), DriverError> {
        let deadline = Instant::now() + timeout;
        let mut last_error = None;

        loop {
            let attempt = match self.find_visible(matcher).await {
                Ok(Some(element)) => Some(self.perform(&element, action).await),
                Ok(None) => None,
                Err(e) => Some(Err(e)),
            };
            match attempt {
                None => {}
                Some(Ok(())) => return Ok(()),
                // Overlays and re-renders make lookups and clicks fail transiently.
                Some(Err(DriverError::WebDriver { error, message, .. })) => {
                    debug!(%matcher, %error, "action failed, retrying");
                    last_error = Some(format!("{error}: {message}"));
                }
                Some(Err(e)) => return Err(e),
            }

            if Instant::now() >= deadline {
                let what = match last_error {
                    Some(err) => format!("{matcher} (last error: {err})"),
                    None => matcher.to_string(),
                };
                return Err(DriverError::Timeout { what, timeout });
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn is_visible(
        &mut self,
        matcher: &Matcher,
        timeout: Duration,
    ) -> Result<bool, DriverError> {
        let deadline = Instant::now() + timeout;

        loop {
            if self.find_visible(matcher).await?.is_some() {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn wait_for_quiescence(&mut self, timeout: Duration) -> Result<(), DriverError> {
        let deadline = Instant::now() + timeout;
        let mut last_seen: Option<(u64, Instant)> = None;

        loop {
            let activity = self.page_activity().await?;
            let now = Instant::now();

            if activity.ready_state == ReadyState::Complete {
                match last_seen {
                    Some((count, since)) if count == activity.resources => {
                        if now.duration_since(since) >= QUIET_PERIOD {
                            return Ok(());
                        }
                    }
                    _ => last_seen = Some((activity.resources, now)),
                }
            } else {
                last_seen = None;
            }

            if now >= deadline {
                return Err(DriverError::Timeout {
                    what: "network quiescence".to_string(),
                    timeout,
                });
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn capture_evidence(&mut self, path: &Path) -> Result<(), DriverError> {
        let encoded: String = self.get("/screenshot").await?;
        let png = decode_screenshot(&encoded)?;

        let write_err = |source| DriverError::Evidence {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(path, png).map_err(write_err)
    }

    async fn close(self) -> Result<(), DriverError> {
        let _: Value = send(self.http.delete(&self.base)).await?;
        debug!(session = %self.base, "WebDriver session closed");
        Ok(())
    }
}

/// Send a request and unwrap the WebDriver response envelope.
async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, DriverError> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(parse_error(status.as_u16(), &body));
    }

    serde_json::from_str::<Envelope<T>>(&body)
        .map(|env| env.value)
        .map_err(|e| DriverError::Protocol(format!("{e} (body: {})", truncate(&body))))
}

/// Turn an error response into a [`DriverError`].
fn parse_error(status: u16, body: &str) -> DriverError {
    match serde_json::from_str::<Envelope<ErrorValue>>(body) {
        Ok(env) => DriverError::WebDriver {
            status,
            error: env.value.error,
            message: env.value.message,
        },
        Err(_) => DriverError::Protocol(format!("HTTP {status}: {}", truncate(body))),
    }
}

fn decode_screenshot(encoded: &str) -> Result<Vec<u8>, DriverError> {
    STANDARD
        .decode(encoded)
        .map_err(|e| DriverError::Protocol(format!("invalid screenshot data: {e}")))
}

fn truncate(body: &str) -> String {
    body.chars().take(500).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = WebDriverConfig::new("http://localhost:4444")
            .with_headless(false)
            .with_timeout(30)
            .with_poll_interval(Duration::from_millis(100));

        assert_eq!(config.base_url, "http://localhost:4444");
        assert!(!config.headless);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.poll_interval, Duration::from_millis(100));
    }

    #[test]
    fn config_defaults() {
        let config = WebDriverConfig::new("http://localhost:9515");

        assert!(config.headless);
        assert_eq!(config.timeout_secs, 120);
        assert_eq!(config.poll_interval, DEFAULT_POLL_INTERVAL);
    }

    #[test]
    fn headless_capabilities() {
        let caps = WebDriverConfig::new("http://localhost:9515").capabilities();
        let always = &caps["capabilities"]["alwaysMatch"];

        assert_eq!(always["pageLoadStrategy"], "eager");
        assert_eq!(
            always["goog:chromeOptions"]["args"],
            json!(["--headless=new", "--no-sandbox"])
        );
        assert_eq!(always["moz:firefoxOptions"]["args"], json!(["-headless"]));
    }

    #[test]
    fn headed_capabilities() {
        let caps = WebDriverConfig::new("http://localhost:9515")
            .with_headless(false)
            .capabilities();
        let always = &caps["capabilities"]["alwaysMatch"];

        assert_eq!(always["goog:chromeOptions"]["args"], json!([]));
    }

    #[test]
    fn client_creation() {
        let browser = WebDriverBrowser::new(WebDriverConfig::new("http://localhost:9515"));
        assert!(browser.is_ok());
    }

    #[test]
    fn parse_webdriver_error() {
        let body = r#"{"value":{"error":"timeout","message":"page load timed out","stacktrace":""}}"#;
        match parse_error(500, body) {
            DriverError::WebDriver {
                status,
                error,
                message,
            } => {
                assert_eq!(status, 500);
                assert_eq!(error, "timeout");
                assert_eq!(message, "page load timed out");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parse_non_json_error() {
        let err = parse_error(502, "Bad Gateway");
        assert_eq!(
            err.to_string(),
            "unexpected WebDriver response: HTTP 502: Bad Gateway"
        );
    }

    #[test]
    fn decode_valid_screenshot() {
        // PNG signature
        let png = decode_screenshot("iVBORw0KGgo=").unwrap();
        assert_eq!(png, vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn decode_invalid_screenshot() {
        assert!(decode_screenshot("not base64!").is_err());
    }

    #[test]
    fn truncate_long_bodies() {
        let body = "x".repeat(2000);
        assert_eq!(truncate(&body).len(), 500);
    }

    mod fake_endpoint {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};

        use axum::extract::State;
        use axum::http::StatusCode;
        use axum::routing::{get, post};
        use axum::{Json, Router};
        use tokio::net::TcpListener;

        use super::*;
        use crate::webdriver::types::ELEMENT_KEY;

        type Lookups = Arc<AtomicUsize>;

        /// Serve `app` on an ephemeral port and return its base URL.
        async fn serve(app: Router) -> String {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
            format!("http://{addr}")
        }

        /// Element lookups fail with a stale reference `stale` times, then
        /// find one displayed element.
        fn driver(stale: usize, lookups: Lookups) -> Router {
            let elements = move |State(lookups): State<Lookups>| async move {
                if lookups.fetch_add(1, Ordering::SeqCst) < stale {
                    (
                        StatusCode::NOT_FOUND,
                        Json(json!({"value": {
                            "error": "stale element reference",
                            "message": "element is not attached to the page document",
                            "stacktrace": ""
                        }})),
                    )
                } else {
                    (StatusCode::OK, Json(json!({"value": [{ ELEMENT_KEY: "e1" }]})))
                }
            };

            Router::new()
                .route("/session/:sid/elements", post(elements))
                .route(
                    "/session/:sid/element/:eid/displayed",
                    get(|| async { Json(json!({"value": true})) }),
                )
                .route(
                    "/session/:sid/element/:eid/click",
                    post(|| async { Json(json!({"value": null})) }),
                )
                .with_state(lookups)
        }

        fn session(base_url: &str) -> WebDriverSession {
            WebDriverSession {
                http: reqwest::Client::new(),
                base: format!("{base_url}/session/s1"),
                poll_interval: Duration::from_millis(10),
            }
        }

        #[tokio::test]
        async fn stale_lookup_is_retried() {
            let lookups = Lookups::default();
            let url = serve(driver(2, lookups.clone())).await;
            let mut session = session(&url);

            session
                .act(&Matcher::exact_text("20:30"), &Action::Click, Duration::from_secs(5))
                .await
                .unwrap();

            assert_eq!(lookups.load(Ordering::SeqCst), 3);
        }

        #[tokio::test]
        async fn persistent_stale_lookup_times_out_with_last_error() {
            let url = serve(driver(usize::MAX, Lookups::default())).await;
            let mut session = session(&url);

            let err = session
                .act(&Matcher::exact_text("20:30"), &Action::Click, Duration::from_millis(100))
                .await
                .unwrap_err();

            assert!(err.is_timeout());
            assert!(err.to_string().contains("stale element reference"));
        }

        #[tokio::test]
        async fn transport_errors_are_not_retried() {
            let lookups = Lookups::default();
            let counted = lookups.clone();
            let app = Router::new().route(
                "/session/:sid/elements",
                post(move || {
                    counted.fetch_add(1, Ordering::SeqCst);
                    async { (StatusCode::BAD_GATEWAY, "Bad Gateway") }
                }),
            );
            let url = serve(app).await;
            let mut session = session(&url);

            let err = session
                .act(&Matcher::exact_text("20:30"), &Action::Click, Duration::from_secs(5))
                .await
                .unwrap_err();

            assert!(matches!(err, DriverError::Protocol(_)));
            assert_eq!(lookups.load(Ordering::SeqCst), 1);
        }
    }

    // End-to-end tests need a running chromedriver and network access to
    // the booking site; they are not part of the unit test suite.
}
