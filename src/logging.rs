//! Tracing setup.
//!
//! Log levels come from `PHARMALOG_LOG` (same syntax as `RUST_LOG`), e.g.
//! `PHARMALOG_LOG=pharmalog::store=debug,pharmalog=info`. Without it the
//! level is `pharmalog=info`, or `pharmalog=debug` with `--verbose`.
//! Output always goes to stderr so command output on stdout stays clean.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, prelude::*};

pub const LOG_ENV: &str = "PHARMALOG_LOG";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "pharmalog=debug"
        } else {
            "pharmalog=info"
        })
    })
}

/// Install the global subscriber.
///
/// With `log_dir` set, a daily-rolling `pharmalog.log` is written there as
/// well; keep the returned guard alive until exit so it gets flushed.
/// Calling this twice is harmless: the second call leaves the first
/// subscriber in place.
pub fn init_tracing(verbose: bool, json: bool, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let mut layers: Vec<BoxedLayer> = Vec::new();

    let stderr = fmt::layer().with_writer(std::io::stderr).with_target(verbose);
    layers.push(if json {
        stderr.json().boxed()
    } else {
        stderr.boxed()
    });

    let guard = log_dir.map(|dir| {
        let appender = tracing_appender::rolling::daily(dir, "pharmalog.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let file = fmt::layer().with_writer(writer).with_ansi(false);
        layers.push(if json { file.json().boxed() } else { file.boxed() });
        guard
    });

    let _ = tracing_subscriber::registry()
        .with(layers)
        .with(filter(verbose))
        .try_init();
    guard
}
