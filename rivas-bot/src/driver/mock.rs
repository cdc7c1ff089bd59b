//! Scripted browser for testing without a real WebDriver endpoint.
//!
//! Every element is considered present and clickable unless it has been
//! registered as missing. Visibility probes only succeed for matchers
//! registered as visible. All calls are recorded so tests can assert on
//! exactly what the booking flow did.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::error::DriverError;
use super::matcher::{Action, Matcher};
use super::{Browser, Session};

/// Something the mock browser was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockEvent {
    SessionOpened(usize),
    Navigated(String),
    Acted { matcher: Matcher, action: Action },
    Probed(Matcher),
    Quiesced,
    Captured(PathBuf),
    SessionClosed(usize),
}

#[derive(Default)]
struct MockState {
    missing: Vec<Matcher>,
    visible: Vec<Matcher>,
    redirects: Vec<(Matcher, String)>,
    failing_navigations: usize,
    failing_sessions: usize,
    quiescence_fails: bool,
    capture_fails: bool,
    sessions_opened: usize,
    events: Vec<MockEvent>,
}

/// Mock browser whose sessions follow a fixed script.
///
/// Clones share the same script and event log.
#[derive(Clone, Default)]
pub struct MockBrowser {
    state: Arc<Mutex<MockState>>,
}

impl MockBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acting on or probing this matcher times out.
    pub fn with_missing(self, matcher: Matcher) -> Self {
        self.lock().missing.push(matcher);
        self
    }

    /// Probing this matcher reports it as visible.
    pub fn with_visible(self, matcher: Matcher) -> Self {
        self.lock().visible.push(matcher);
        self
    }

    /// Acting on this matcher moves the session to `url`.
    pub fn with_redirect(self, matcher: Matcher, url: impl Into<String>) -> Self {
        self.lock().redirects.push((matcher, url.into()));
        self
    }

    /// The next `n` navigations fail.
    pub fn failing_navigations(self, n: usize) -> Self {
        self.lock().failing_navigations = n;
        self
    }

    /// The next `n` session starts fail.
    pub fn failing_sessions(self, n: usize) -> Self {
        self.lock().failing_sessions = n;
        self
    }

    /// Waiting for quiescence always times out.
    pub fn failing_quiescence(self) -> Self {
        self.lock().quiescence_fails = true;
        self
    }

    /// Screenshots always fail.
    pub fn failing_captures(self) -> Self {
        self.lock().capture_fails = true;
        self
    }

    /// Everything recorded so far, in order.
    pub fn events(&self) -> Vec<MockEvent> {
        self.lock().events.clone()
    }

    /// URLs navigated to, in order.
    pub fn navigations(&self) -> Vec<String> {
        self.filter_events(|e| match e {
            MockEvent::Navigated(url) => Some(url.clone()),
            _ => None,
        })
    }

    /// Matchers acted on successfully, in order.
    pub fn acted_on(&self) -> Vec<Matcher> {
        self.filter_events(|e| match e {
            MockEvent::Acted { matcher, .. } => Some(matcher.clone()),
            _ => None,
        })
    }

    /// Matchers probed for visibility, in order.
    pub fn probes(&self) -> Vec<Matcher> {
        self.filter_events(|e| match e {
            MockEvent::Probed(matcher) => Some(matcher.clone()),
            _ => None,
        })
    }

    /// Evidence paths captured, in order.
    pub fn captures(&self) -> Vec<PathBuf> {
        self.filter_events(|e| match e {
            MockEvent::Captured(path) => Some(path.clone()),
            _ => None,
        })
    }

    pub fn sessions_opened(&self) -> usize {
        self.lock().sessions_opened
    }

    pub fn sessions_closed(&self) -> usize {
        self.filter_events(|e| match e {
            MockEvent::SessionClosed(id) => Some(*id),
            _ => None,
        })
        .len()
    }

    fn filter_events<T>(&self, f: impl Fn(&MockEvent) -> Option<T>) -> Vec<T> {
        self.lock().events.iter().filter_map(f).collect()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Browser for MockBrowser {
    type Session = MockSession;

    async fn open_session(&self) -> Result<MockSession, DriverError> {
        let mut state = self.lock();

        if state.failing_sessions > 0 {
            state.failing_sessions -= 1;
            return Err(DriverError::Protocol("mock session refused".to_string()));
        }

        state.sessions_opened += 1;
        let id = state.sessions_opened;
        state.events.push(MockEvent::SessionOpened(id));

        Ok(MockSession {
            id,
            url: "about:blank".to_string(),
            browser: self.clone(),
        })
    }
}

/// A session created by [`MockBrowser`].
pub struct MockSession {
    id: usize,
    url: String,
    browser: MockBrowser,
}

impl MockSession {
    fn timeout(matcher: &Matcher, timeout: Duration) -> DriverError {
        DriverError::Timeout {
            what: matcher.to_string(),
            timeout,
        }
    }
}

impl Session for MockSession {
    async fn navigate(&mut self, url: &str, _timeout: Duration) -> Result<(), DriverError> {
        let mut state = self.browser.lock();

        if state.failing_navigations > 0 {
            state.failing_navigations -= 1;
            return Err(DriverError::Navigation {
                url: url.to_string(),
                message: "mock navigation failure".to_string(),
            });
        }

        state.events.push(MockEvent::Navigated(url.to_string()));
        self.url = url.to_string();
        Ok(())
    }

    async fn current_url(&mut self) -> Result<String, DriverError> {
        Ok(self.url.clone())
    }

    async fn act(
        &mut self,
        matcher: &Matcher,
        action: &Action,
        timeout: Duration,
    ) -> Result<(), DriverError> {
        let mut state = self.browser.lock();

        if state.missing.contains(matcher) {
            return Err(Self::timeout(matcher, timeout));
        }

        state.events.push(MockEvent::Acted {
            matcher: matcher.clone(),
            action: action.clone(),
        });

        if let Some((_, url)) = state.redirects.iter().find(|(m, _)| m == matcher) {
            self.url = url.clone();
        }

        Ok(())
    }

    async fn is_visible(
        &mut self,
        matcher: &Matcher,
        timeout: Duration,
    ) -> Result<bool, DriverError> {
        let mut state = self.browser.lock();
        state.events.push(MockEvent::Probed(matcher.clone()));

        if state.missing.contains(matcher) {
            return Err(Self::timeout(matcher, timeout));
        }

        Ok(state.visible.contains(matcher))
    }

    async fn wait_for_quiescence(&mut self, timeout: Duration) -> Result<(), DriverError> {
        let mut state = self.browser.lock();

        if state.quiescence_fails {
            return Err(DriverError::Timeout {
                what: "network quiescence".to_string(),
                timeout,
            });
        }

        state.events.push(MockEvent::Quiesced);
        Ok(())
    }

    async fn capture_evidence(&mut self, path: &Path) -> Result<(), DriverError> {
        let mut state = self.browser.lock();

        if state.capture_fails {
            return Err(DriverError::Evidence {
                path: path.to_path_buf(),
                source: std::io::Error::other("mock capture failure"),
            });
        }

        state.events.push(MockEvent::Captured(path.to_path_buf()));
        Ok(())
    }

    async fn close(self) -> Result<(), DriverError> {
        self.browser
            .lock()
            .events
            .push(MockEvent::SessionClosed(self.id));
        Ok(())
    }
}
