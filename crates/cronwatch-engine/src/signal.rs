use std::fmt;

/// Lifecycle signals the engine subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleSignal {
    /// Emitted before the job runs.
    PreRun,
    /// Emitted after the job returned successfully.
    PostRun,
    /// Emitted after the job failed.
    Failure,
}

impl LifecycleSignal {
    pub const ALL: [Self; 3] = [Self::PreRun, Self::PostRun, Self::Failure];
}

impl fmt::Display for LifecycleSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PreRun => write!(f, "pre_run"),
            Self::PostRun => write!(f, "post_run"),
            Self::Failure => write!(f, "failure"),
        }
    }
}
