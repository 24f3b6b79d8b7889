use std::io;
use std::path::Path;
use tracing_appender::rolling;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONSOLE_FILTER: &str = "info,dedup=info,ingest=info,config=warn";
const DEFAULT_FILE_FILTER: &str = "info,dedup=debug,ingest=debug,config=debug";

/// Console filter, taken from `RUST_LOG` when set.
fn console_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_CONSOLE_FILTER))
}

/// Installs the global subscriber.
///
/// Console output goes to stderr so command output on stdout stays machine readable.
/// When `log_dir` is given, a daily rolling `sift.log` is written there as well.
pub fn configure_logging(log_dir: Option<&Path>) {
    let console_log = fmt::layer()
        .with_writer(io::stderr)
        .with_filter(console_filter());

    let file_log = log_dir.map(|dir| {
        let file_appender = rolling::daily(dir, "sift.log");
        fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender)
            .with_filter(EnvFilter::new(DEFAULT_FILE_FILTER))
    });

    tracing_subscriber::Registry::default()
        .with(console_log)
        .with(file_log)
        .init();
}
