//! Scheduling rules as seen by the check-in engine.
//!
//! The engine never evaluates a trigger; it only needs to know whether the
//! rule behind a run has a crontab form it can report to the backend.

use std::fmt;
use std::time::Duration;

/// The rule that produced a scheduled run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// A fixed five-field cron expression, e.g. `0 9 * * 1`.
    Cron(String),
    /// Runs every `every`, with no crontab representation.
    Periodic { every: Duration },
    /// Delays each run of `inner` by a random amount up to `max_delay`.
    Jitter {
        inner: Box<Trigger>,
        max_delay: Duration,
    },
}

impl Trigger {
    #[must_use]
    pub fn cron(expression: impl Into<String>) -> Self {
        Self::Cron(expression.into())
    }

    #[must_use]
    pub fn every(every: Duration) -> Self {
        Self::Periodic { every }
    }

    /// Wraps this trigger in a jitter decorator.
    #[must_use]
    pub fn with_jitter(self, max_delay: Duration) -> Self {
        Self::Jitter {
            inner: Box::new(self),
            max_delay,
        }
    }

    /// Strips every decorator layer and returns the rule underneath.
    #[must_use]
    pub fn underlying(&self) -> &Trigger {
        let mut trigger = self;
        while let Self::Jitter { inner, .. } = trigger {
            trigger = inner;
        }
        trigger
    }

    /// The crontab expression to report, if the underlying rule is a cron rule.
    #[must_use]
    pub fn cron_expression(&self) -> Option<&str> {
        match self.underlying() {
            Self::Cron(expression) => Some(expression),
            _ => None,
        }
    }

    /// The largest random delay applied before a run, summed over all
    /// decorator layers.
    #[must_use]
    pub fn max_jitter(&self) -> Duration {
        let mut total = Duration::ZERO;
        let mut trigger = self;
        while let Self::Jitter { inner, max_delay } = trigger {
            total += *max_delay;
            trigger = inner;
        }
        total
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cron(expression) => write!(f, "{expression}"),
            Self::Periodic { every } => write!(f, "every {}s", every.as_secs()),
            Self::Jitter { inner, max_delay } => {
                write!(f, "{inner} with 0-{}s jitter", max_delay.as_secs())
            }
        }
    }
}
