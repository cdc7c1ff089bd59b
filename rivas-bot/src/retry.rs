//! Retry controller: at most two attempts with a fixed pause.

use std::process::ExitCode;
use std::time::Duration;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::booking::{Orchestrator, Outcome};
use crate::driver::Browser;
use crate::holidays::HolidayLookup;

/// Pause between a failed attempt and the retry.
pub const RETRY_DELAY: Duration = Duration::from_secs(15);

/// Total attempts, including the first.
pub const MAX_ATTEMPTS: usize = 2;

/// One complete booking attempt for a date.
#[allow(async_fn_in_trait)]
pub trait BookingAttempt {
    async fn attempt(&self, date: NaiveDate) -> Outcome;
}

impl<B: Browser, H: HolidayLookup> BookingAttempt for Orchestrator<B, H> {
    async fn attempt(&self, date: NaiveDate) -> Outcome {
        Orchestrator::attempt(self, date).await
    }
}

/// Overall result of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    Failure,
}

impl RunStatus {
    /// Process exit code: 0 on success, 1 on failure.
    pub fn code(self) -> u8 {
        match self {
            RunStatus::Success => 0,
            RunStatus::Failure => 1,
        }
    }
}

impl From<RunStatus> for ExitCode {
    fn from(status: RunStatus) -> Self {
        ExitCode::from(status.code())
    }
}

/// Runs an attempt, and once more after a pause if it failed.
pub struct RetryController<A> {
    attempt: A,
    delay: Duration,
}

impl<A: BookingAttempt> RetryController<A> {
    pub fn new(attempt: A) -> Self {
        Self {
            attempt,
            delay: RETRY_DELAY,
        }
    }

    /// Use a different pause between attempts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Book `date`, retrying once on failure.
    pub async fn run(&self, date: NaiveDate) -> RunStatus {
        for n in 1..=MAX_ATTEMPTS {
            let outcome = self.attempt.attempt(date).await;

            if outcome.is_success() {
                info!(attempt = n, "run succeeded");
                return RunStatus::Success;
            }

            if n < MAX_ATTEMPTS {
                warn!(
                    attempt = n,
                    error = outcome.error().unwrap_or("unknown"),
                    "attempt failed, retrying in {}s",
                    self.delay.as_secs()
                );
                tokio::time::sleep(self.delay).await;
            }
        }

        warn!(attempts = MAX_ATTEMPTS, "all attempts failed");
        RunStatus::Failure
    }

    pub fn attempt(&self) -> &A {
        &self.attempt
    }
}
