// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging.
//!
//! Message types live under [`messages`] and follow a struct-based pattern
//! with `Display` so that log text is not scattered through the codebase as
//! string literals. [`init_tracing`] installs the subscriber used by the CLI.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub mod messages;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `hpstr=info`, or `hpstr=debug` when
/// `verbose` is on. Calling this twice is a no-op.
pub fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init();
}

fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "hpstr=debug"
    } else {
        "hpstr=info"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(false), "hpstr=info");
        assert_eq!(default_filter(true), "hpstr=debug");
    }
}
