//! Tracing setup for the command line.
//!
//! The subscriber is only installed when `CJSNAV_LOG` (or `RUST_LOG`)
//! is set, so there is zero overhead in normal runs. Values use the
//! usual `RUST_LOG` syntax:
//!
//! ```bash
//! CJSNAV_LOG=debug cjsnav def src/main.js 3 8
//! CJSNAV_LOG=cjsnav_core::module_resolver=trace cjsnav def src/main.js 3 8
//! ```
//!
//! All output goes to stderr so it never mixes with the JSON results
//! on stdout.

use tracing_subscriber::EnvFilter;

/// Build an `EnvFilter` from `CJSNAV_LOG`, falling back to `RUST_LOG`.
fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var("CJSNAV_LOG") {
        EnvFilter::builder().parse_lossy(val)
    } else {
        EnvFilter::from_default_env()
    }
}

/// Install the global subscriber if logging was requested.
pub fn init_tracing() {
    let requested =
        std::env::var("CJSNAV_LOG").is_ok() || std::env::var("RUST_LOG").is_ok();
    if !requested {
        return;
    }

    tracing_subscriber::fmt()
        .with_env_filter(build_filter())
        .with_writer(std::io::stderr)
        .init();
}
