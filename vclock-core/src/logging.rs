use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::SubscriberBuilder;

use crate::errors::{Result, VClockError};

/// Installs the fmt subscriber the clock server logs through. `vclock`
/// calls it once at startup; a second call fails with `LoggingError`.
///
/// `RUST_LOG` wins over `level`, which normally comes from
/// [`crate::ClockConfig::log_level`]. Offset changes land at `info`,
/// rejected packed times at `debug`.
pub fn init_tracing(level: Option<&str>) -> Result<()> {
    let default_level = level.unwrap_or("info");
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    SubscriberBuilder::default()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(atty::is(atty::Stream::Stdout))
        .try_init()
        .map_err(|err| VClockError::LoggingError(err.to_string()))?;

    Ok(())
}
