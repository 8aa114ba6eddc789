//! Check-in reporting: the interface the correlation engine talks to, and a
//! live implementation that sends Sentry cron check-ins over HTTP.

pub mod client;
pub mod dsn;
pub mod envelope;
pub mod error;
pub mod reporter;

pub use client::SentryReporter;
pub use dsn::Dsn;
pub use envelope::CheckInStatus;
pub use error::ReporterError;
pub use reporter::CheckInReporter;
