use std::fmt;

use serde::{Deserialize, Serialize};

use crate::trigger::Trigger;

/// Opaque token assigned by the monitoring backend when a check-in opens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckInId(String);

impl CheckInId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CheckInId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for CheckInId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for CheckInId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// One scheduled dispatch of a job. Lives for a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionContext {
    /// Scheduler-assigned identifier, unique per dispatch.
    pub id: String,
    pub trigger: Trigger,
}

impl ExecutionContext {
    #[must_use]
    pub fn new(id: impl Into<String>, trigger: Trigger) -> Self {
        Self {
            id: id.into(),
            trigger,
        }
    }
}
