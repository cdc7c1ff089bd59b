//! Booking attempt errors.

use std::fmt;

use crate::driver::{ChainExhausted, DriverError};

/// A step of the booking flow, used to give errors context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStep {
    Navigate,
    SelectSlot,
    SelectDuration,
    CheckLogin,
    LoginUser,
    LoginPassword,
    LoginSubmit,
    Confirm,
    AwaitConfirmation,
}

impl fmt::Display for BookingStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BookingStep::Navigate => "opening booking page",
            BookingStep::SelectSlot => "selecting slot",
            BookingStep::SelectDuration => "selecting duration",
            BookingStep::CheckLogin => "checking for login redirect",
            BookingStep::LoginUser => "filling username",
            BookingStep::LoginPassword => "filling password",
            BookingStep::LoginSubmit => "submitting login",
            BookingStep::Confirm => "clicking reserve",
            BookingStep::AwaitConfirmation => "waiting for confirmation page",
        };
        f.write_str(name)
    }
}

/// Why a booking attempt stopped early.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    /// The browser session could not be created
    #[error("could not start browser session: {0}")]
    SessionStart(#[source] DriverError),

    /// A single-strategy step failed
    #[error("{step} failed: {source}")]
    Step {
        step: BookingStep,
        #[source]
        source: DriverError,
    },

    /// Every strategy of a fallback step failed
    #[error("{step} failed: {source}")]
    Exhausted {
        step: BookingStep,
        #[source]
        source: ChainExhausted,
    },

    /// The site asked for a login and no credentials are configured
    #[error("login required but GYM_USER/GYM_PASS are not set")]
    MissingCredentials,
}

impl BookingError {
    pub(crate) fn step(step: BookingStep) -> impl FnOnce(DriverError) -> Self {
        move |source| BookingError::Step { step, source }
    }

    pub(crate) fn exhausted(step: BookingStep) -> impl FnOnce(ChainExhausted) -> Self {
        move |source| BookingError::Exhausted { step, source }
    }
}
