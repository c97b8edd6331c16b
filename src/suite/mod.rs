//! The ordered end-to-end checks against a users resource, plus cleanup.

pub mod expect;
pub mod scenarios;

use std::fmt::Write as _;
use std::time::{Duration, Instant};

use reqwest::StatusCode;
use tracing::{error, info, info_span, instrument, warn, Instrument};

use crate::clients::UsersClient;
use crate::domain::NewUser;
use crate::error::{AssertionError, CheckError};
pub use scenarios::{Check, SuiteContext, INVALID_TOKEN_VALUE};

/// Fixture shared by the checks of one run.
#[derive(Debug, Clone)]
pub struct SuiteState {
    /// What the remote record is expected to look like.
    pub expected: NewUser,
    /// Set by the create check.
    pub user_id: Option<u64>,
}

impl SuiteState {
    pub fn new(expected: NewUser) -> Self {
        Self {
            expected,
            user_id: None,
        }
    }

    pub fn require_user_id(&self) -> Result<u64, AssertionError> {
        self.user_id.ok_or(AssertionError::MissingUserId)
    }
}

#[derive(Debug)]
pub struct CheckOutcome {
    pub check: Check,
    pub result: Result<(), CheckError>,
    pub elapsed: Duration,
}

impl CheckOutcome {
    pub fn passed(&self) -> bool {
        self.result.is_ok()
    }
}

/// Result of the best-effort delete at teardown. Never counted as a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupOutcome {
    NotNeeded,
    Deleted,
    AlreadyGone,
    Failed(String),
}

impl CleanupOutcome {
    fn describe(&self) -> String {
        match self {
            CleanupOutcome::NotNeeded => "no user was created".to_string(),
            CleanupOutcome::Deleted => "created user deleted".to_string(),
            CleanupOutcome::AlreadyGone => "created user was already deleted".to_string(),
            CleanupOutcome::Failed(reason) => format!("delete failed ({reason})"),
        }
    }
}

#[derive(Debug)]
pub struct SuiteReport {
    pub outcomes: Vec<CheckOutcome>,
    pub cleanup: CleanupOutcome,
    pub state: SuiteState,
}

impl SuiteReport {
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.passed()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    #[cfg(test)]
    pub fn outcome(&self, check: Check) -> Option<&CheckOutcome> {
        self.outcomes.iter().find(|o| o.check == check)
    }

    /// Plain-text summary, one line per check.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for outcome in &self.outcomes {
            let verdict = if outcome.passed() { "PASS" } else { "FAIL" };
            let _ = writeln!(
                out,
                "{verdict}  {:<18} {} ({} ms)",
                outcome.check.group().route(),
                outcome.check.description(),
                outcome.elapsed.as_millis()
            );
            if let Err(e) = &outcome.result {
                let _ = writeln!(out, "      {e}");
            }
        }
        let _ = write!(
            out,
            "{} checks: {} passed, {} failed; cleanup: {}",
            self.outcomes.len(),
            self.passed(),
            self.failed(),
            self.cleanup.describe()
        );
        out
    }
}

pub struct Suite {
    ctx: SuiteContext,
}

impl Suite {
    pub fn new(client: UsersClient, page_size: u32) -> Self {
        let unauthorized = client.with_token(INVALID_TOKEN_VALUE);
        Self {
            ctx: SuiteContext {
                client,
                unauthorized,
                page_size,
            },
        }
    }

    /// Runs every check in [`Check::SEQUENCE`] with `user` as the record to
    /// create, then deletes the record if one was created.
    pub async fn run(&self, user: NewUser) -> SuiteReport {
        let mut state = SuiteState::new(user);
        let outcomes = self.run_checks(&Check::SEQUENCE, &mut state).await;
        let cleanup = self.cleanup(&state).await;
        SuiteReport {
            outcomes,
            cleanup,
            state,
        }
    }

    pub async fn run_checks(&self, checks: &[Check], state: &mut SuiteState) -> Vec<CheckOutcome> {
        let mut outcomes = Vec::with_capacity(checks.len());
        for &check in checks {
            let span = info_span!(
                "check",
                route = check.group().route(),
                check = check.description()
            );
            let started = Instant::now();
            let result = check.run(&self.ctx, state).instrument(span.clone()).await;
            let elapsed = started.elapsed();
            span.in_scope(|| match &result {
                Ok(()) => info!(elapsed_ms = elapsed.as_millis() as u64, "Check passed"),
                Err(e) => error!(error = %e, "Check failed"),
            });
            outcomes.push(CheckOutcome {
                check,
                result,
                elapsed,
            });
        }
        outcomes
    }

    #[instrument(skip(self, state))]
    pub(crate) async fn cleanup(&self, state: &SuiteState) -> CleanupOutcome {
        let Some(id) = state.user_id else {
            return CleanupOutcome::NotNeeded;
        };
        match self.ctx.client.delete_user(id).await {
            Ok(response) if response.status == StatusCode::NO_CONTENT => {
                info!(user_id = id, "Deleted created user");
                CleanupOutcome::Deleted
            }
            Ok(response) if response.status == StatusCode::NOT_FOUND => {
                info!(user_id = id, "Created user already deleted");
                CleanupOutcome::AlreadyGone
            }
            Ok(response) => {
                warn!(user_id = id, status = %response.status, "Cleanup delete returned unexpected status");
                CleanupOutcome::Failed(format!("status {}", response.status))
            }
            Err(e) => {
                warn!(user_id = id, error = %e, "Cleanup delete failed");
                CleanupOutcome::Failed(e.to_string())
            }
        }
    }
}
