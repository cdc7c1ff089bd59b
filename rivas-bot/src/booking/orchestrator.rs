//! The reservation state machine.
//!
//! One attempt walks the booking site through a fixed sequence:
//!
//! ```text
//! Init → Navigated → SlotSelected → DurationSelected → (LoggedIn | LoginSkipped)
//!      → ConfirmClicked → AwaitingConfirmation → Booked | Unconfirmed | Failed
//! ```
//!
//! Each transition is a single bounded driver call returning a `Result`;
//! the first error aborts the attempt. Whatever happens, the session is
//! closed before the attempt returns.

use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::{debug, error, info, warn};

use crate::config::{BotConfig, Credentials, FacilityConfig, StepTimeouts};
use crate::domain::{Decision, Target};
use crate::driver::{Action, Browser, FallbackChain, Matcher, Session};
use crate::holidays::HolidayLookup;
use crate::policy::DatePolicy;

use super::confirmation::{ConfirmationDetector, Detection};
use super::error::{BookingError, BookingStep};
use super::outcome::Outcome;

/// Screenshot written when no confirmation indicator is found.
pub const UNCONFIRMED_EVIDENCE: &str = "fallback_state.png";

/// Screenshot written when a step fails.
pub const ERROR_EVIDENCE: &str = "error.png";

/// Progress through a booking attempt.
///
/// Terminal states are reported as an [`Outcome`] rather than a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    Init,
    Navigated,
    SlotSelected,
    DurationSelected,
    LoggedIn,
    LoginSkipped,
    ConfirmClicked,
    AwaitingConfirmation,
}

/// Lookup chains for the login form.
#[derive(Debug, Clone)]
struct LoginForm {
    user: FallbackChain,
    pass: FallbackChain,
    submit: FallbackChain,
}

impl LoginForm {
    fn new(facility: &FacilityConfig, timeouts: &StepTimeouts) -> Self {
        let (primary, fallback) = (timeouts.login_primary, timeouts.login_fallback);
        Self {
            user: FallbackChain::new(Matcher::label(&facility.user_label), primary)
                .or(Matcher::css("input[type='text'], input[type='email']"), fallback),
            pass: FallbackChain::new(Matcher::label(&facility.pass_label), primary)
                .or(Matcher::css("input[type='password']"), fallback),
            submit: FallbackChain::new(Matcher::button(&facility.login_button), fallback)
                .or(Matcher::text_contains(&facility.login_button), fallback),
        }
    }
}

/// Drives booking attempts against a browser.
pub struct Orchestrator<B, H> {
    browser: B,
    policy: DatePolicy<H>,
    facility: FacilityConfig,
    timeouts: StepTimeouts,
    credentials: Option<Credentials>,
    login: LoginForm,
    detector: ConfirmationDetector,
    evidence_dir: PathBuf,
}

impl<B: Browser, H: HolidayLookup> Orchestrator<B, H> {
    pub fn new(browser: B, policy: DatePolicy<H>, config: &BotConfig) -> Self {
        Self {
            browser,
            policy,
            facility: config.facility.clone(),
            timeouts: config.timeouts.clone(),
            credentials: config.credentials.clone(),
            login: LoginForm::new(&config.facility, &config.timeouts),
            detector: ConfirmationDetector::for_facility(&config.facility, &config.timeouts),
            evidence_dir: config.evidence_dir.clone(),
        }
    }

    /// Run one booking attempt for `date`.
    ///
    /// Dates the policy excludes return [`Outcome::Skipped`] without
    /// opening a browser session.
    pub async fn attempt(&self, date: NaiveDate) -> Outcome {
        match self.policy.resolve(date) {
            Decision::NoBooking => {
                info!(%date, "policy says no booking on this date");
                Outcome::Skipped
            }
            Decision::Book(target) => {
                info!(%date, url = self.facility.url_for(target.endpoint), slot = %target.time_of_day, "booking");
                self.book(&target).await
            }
        }
    }

    /// Run one booking attempt for an already resolved target.
    pub async fn book(&self, target: &Target) -> Outcome {
        let mut session = match self.browser.open_session().await {
            Ok(session) => session,
            Err(e) => {
                let err = BookingError::SessionStart(e);
                error!(error = %err, "attempt failed");
                return Outcome::Failed {
                    error: err.to_string(),
                    evidence: None,
                };
            }
        };

        let outcome = match self.drive(&mut session, target).await {
            Ok(Detection::Confirmed(indicator)) => {
                info!(%indicator, "booking complete");
                Outcome::Booked {
                    indicator: indicator.to_string(),
                }
            }
            Ok(Detection::Ambiguous) => {
                warn!("no confirmation indicator found; check the screenshot");
                let evidence = self.capture(&mut session, UNCONFIRMED_EVIDENCE).await;
                Outcome::Unconfirmed { evidence }
            }
            Err(e) => {
                error!(error = %e, "attempt failed");
                let evidence = self.capture(&mut session, ERROR_EVIDENCE).await;
                Outcome::Failed {
                    error: e.to_string(),
                    evidence,
                }
            }
        };

        if let Err(e) = session.close().await {
            warn!(error = %e, "failed to close browser session");
        }

        outcome
    }

    /// Step the state machine until the confirmation page is reached.
    async fn drive(
        &self,
        session: &mut B::Session,
        target: &Target,
    ) -> Result<Detection, BookingError> {
        let mut state = AttemptState::Init;

        loop {
            if state == AttemptState::AwaitingConfirmation {
                return Ok(self.detector.detect(session).await);
            }
            state = self.advance(session, target, state).await?;
            debug!(?state, "advanced");
        }
    }

    /// Perform the transition out of `state`.
    async fn advance(
        &self,
        session: &mut B::Session,
        target: &Target,
        state: AttemptState,
    ) -> Result<AttemptState, BookingError> {
        let t = &self.timeouts;

        match state {
            AttemptState::Init => {
                let url = self.facility.url_for(target.endpoint);
                session
                    .navigate(url, t.navigation)
                    .await
                    .map_err(BookingError::step(BookingStep::Navigate))?;
                Ok(AttemptState::Navigated)
            }
            AttemptState::Navigated => {
                info!(slot = %target.time_of_day, "looking for slot");
                let slot = Matcher::exact_text(target.time_of_day.as_str());
                session
                    .act(&slot, &Action::Click, t.slot)
                    .await
                    .map_err(BookingError::step(BookingStep::SelectSlot))?;
                Ok(AttemptState::SlotSelected)
            }
            AttemptState::SlotSelected => {
                info!(duration = %self.facility.duration_label, "choosing duration");
                let duration = Matcher::exact_text(&self.facility.duration_label);
                session
                    .act(&duration, &Action::Click, t.duration)
                    .await
                    .map_err(BookingError::step(BookingStep::SelectDuration))?;
                Ok(AttemptState::DurationSelected)
            }
            AttemptState::DurationSelected => {
                let url = session
                    .current_url()
                    .await
                    .map_err(BookingError::step(BookingStep::CheckLogin))?;

                if url.contains(&self.facility.login_url) {
                    self.log_in(session).await?;
                    Ok(AttemptState::LoggedIn)
                } else {
                    debug!("no login required");
                    Ok(AttemptState::LoginSkipped)
                }
            }
            AttemptState::LoggedIn | AttemptState::LoginSkipped => {
                info!(button = %self.facility.confirm_button, "confirming reservation");
                let confirm = Matcher::button(&self.facility.confirm_button);
                session
                    .act(&confirm, &Action::Click, t.confirm)
                    .await
                    .map_err(BookingError::step(BookingStep::Confirm))?;
                Ok(AttemptState::ConfirmClicked)
            }
            AttemptState::ConfirmClicked => {
                info!("waiting for confirmation");
                session
                    .wait_for_quiescence(t.quiescence)
                    .await
                    .map_err(BookingError::step(BookingStep::AwaitConfirmation))?;
                Ok(AttemptState::AwaitingConfirmation)
            }
            AttemptState::AwaitingConfirmation => Ok(state),
        }
    }

    async fn log_in(&self, session: &mut B::Session) -> Result<(), BookingError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(BookingError::MissingCredentials)?;

        info!(user = %credentials.user, "logging in");

        self.login
            .user
            .act(session, &Action::Fill(credentials.user.clone()))
            .await
            .map_err(BookingError::exhausted(BookingStep::LoginUser))?;
        self.login
            .pass
            .act(session, &Action::Fill(credentials.pass.clone()))
            .await
            .map_err(BookingError::exhausted(BookingStep::LoginPassword))?;
        self.login
            .submit
            .act(session, &Action::Click)
            .await
            .map_err(BookingError::exhausted(BookingStep::LoginSubmit))?;

        Ok(())
    }

    /// Best-effort screenshot; failures are logged and swallowed.
    async fn capture(&self, session: &mut B::Session, name: &str) -> Option<PathBuf> {
        let path = self.evidence_dir.join(name);
        match session.capture_evidence(&path).await {
            Ok(()) => {
                info!(path = %path.display(), "saved screenshot");
                Some(path)
            }
            Err(e) => {
                warn!(error = %e, "failed to save screenshot");
                None
            }
        }
    }
}
