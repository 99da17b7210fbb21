//! Shared plumbing for the pointconfig command-line clients.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::fmt;
use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::{fmt as layer_fmt, prelude::*, EnvFilter};

/// A comma-separated coordinate tuple from the command line, such as `1,-2,0`.
///
/// Coordinates are kept unreduced; the space reduces them mod p.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Coords(pub Vec<i64>);

impl FromStr for Coords {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('(').trim_end_matches(')').trim();
        if trimmed.is_empty() {
            return Ok(Self(Vec::new()));
        }
        trimmed
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<i64>()
                    .map_err(|e| format!("invalid coordinate {:?} in {s:?}: {e}", part.trim()))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl AsRef<[i64]> for Coords {
    fn as_ref(&self) -> &[i64] {
        &self.0
    }
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, c) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{c}")?;
        }
        f.write_str(")")
    }
}

/// Install a stderr `fmt` subscriber.
///
/// `RUST_LOG` wins when set; otherwise each `-v` raises the level from
/// `warn` through `info` and `debug` to `trace`.
pub fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::registry()
        .with(layer_fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
