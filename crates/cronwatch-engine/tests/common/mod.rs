//! In-memory reporter that records every call the engine makes.

#![allow(dead_code, clippy::new_without_default)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use cronwatch_core::{CheckInId, MonitorConfig};
use cronwatch_reporter::{CheckInReporter, ReporterError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Open {
        slug: String,
        cron: String,
        config: MonitorConfig,
    },
    Success {
        slug: String,
        id: CheckInId,
    },
    Failure {
        slug: String,
        id: CheckInId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Normal,
    NoToken,
    FailOpen,
    FailClose,
}

/// Hands out `T1`, `T2`, ... in order of `open` calls.
pub struct RecordingReporter {
    mode: Mode,
    next_id: AtomicUsize,
    calls: Mutex<Vec<Call>>,
}

impl RecordingReporter {
    fn with_mode(mode: Mode) -> Self {
        Self {
            mode,
            next_id: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn new() -> Self {
        Self::with_mode(Mode::Normal)
    }

    /// `open` succeeds but returns no check-in id.
    pub fn without_tokens() -> Self {
        Self::with_mode(Mode::NoToken)
    }

    pub fn failing_open() -> Self {
        Self::with_mode(Mode::FailOpen)
    }

    pub fn failing_close() -> Self {
        Self::with_mode(Mode::FailClose)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn opened(&self) -> usize {
        self.count(|c| matches!(c, Call::Open { .. }))
    }

    pub fn succeeded(&self) -> Vec<CheckInId> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Success { id, .. } => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn failed(&self) -> Vec<CheckInId> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Failure { id, .. } => Some(id),
                _ => None,
            })
            .collect()
    }

    fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn backend_down() -> ReporterError {
        ReporterError::UnexpectedStatus {
            status: 503,
            url: "http://monitor.test/api/1/envelope/".to_string(),
        }
    }
}

impl CheckInReporter for RecordingReporter {
    async fn open(
        &self,
        monitor_slug: &str,
        cron_expression: &str,
        config: &MonitorConfig,
    ) -> Result<Option<CheckInId>, ReporterError> {
        if self.mode == Mode::FailOpen {
            return Err(Self::backend_down());
        }
        self.record(Call::Open {
            slug: monitor_slug.to_string(),
            cron: cron_expression.to_string(),
            config: *config,
        });
        if self.mode == Mode::NoToken {
            return Ok(None);
        }
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(Some(CheckInId::new(format!("T{n}"))))
    }

    async fn close_success(
        &self,
        monitor_slug: &str,
        check_in: &CheckInId,
    ) -> Result<(), ReporterError> {
        if self.mode == Mode::FailClose {
            return Err(Self::backend_down());
        }
        self.record(Call::Success {
            slug: monitor_slug.to_string(),
            id: check_in.clone(),
        });
        Ok(())
    }

    async fn close_failure(
        &self,
        monitor_slug: &str,
        check_in: &CheckInId,
    ) -> Result<(), ReporterError> {
        if self.mode == Mode::FailClose {
            return Err(Self::backend_down());
        }
        self.record(Call::Failure {
            slug: monitor_slug.to_string(),
            id: check_in.clone(),
        });
        Ok(())
    }
}
