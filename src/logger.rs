//! `tracing-subscriber` setup for binaries and test harnesses that embed
//! this crate. The library itself only emits events through `tracing`.

use tracing_subscriber::EnvFilter;

use crate::error::LoggerError;

/// Install a global `fmt` subscriber writing to stderr.
///
/// With `prefer_level` set, `level` wins and `RUST_LOG` is only consulted when
/// `level` does not parse. Otherwise `RUST_LOG` wins and `level` is the
/// fallback.
pub fn init(level: &str, prefer_level: bool) -> Result<(), LoggerError> {
    let filter = select_filter(level, prefer_level)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| LoggerError(format!("failed to set subscriber: {e}")))
}

/// Like [`init`] but routes output through the test harness capture and
/// ignores an already-installed subscriber.
pub fn init_for_tests() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// First directive source that parses wins; the error lists every rejection.
fn select_filter(level: &str, prefer_level: bool) -> Result<EnvFilter, LoggerError> {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let explicit = Some(level.to_string());
    let order = if prefer_level {
        [("level", explicit), ("RUST_LOG", env)]
    } else {
        [("RUST_LOG", env), ("level", explicit)]
    };

    let mut rejected = Vec::new();
    for (source, directives) in order {
        let Some(directives) = directives.filter(|d| !d.trim().is_empty()) else {
            continue;
        };
        match EnvFilter::try_new(&directives) {
            Ok(filter) => return Ok(filter),
            Err(e) => rejected.push(format!("{source} '{directives}': {e}")),
        }
    }
    if rejected.is_empty() {
        return Err(LoggerError("no log level given and RUST_LOG is unset".into()));
    }
    Err(LoggerError(format!("invalid log filter: {}", rejected.join("; "))))
}
