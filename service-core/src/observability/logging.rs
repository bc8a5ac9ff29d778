use std::{
    fs::{self, File, OpenOptions},
    io,
    path::Path,
    sync::Arc,
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_FILE_NAME: &str = "app.log";

/// Install the global subscriber: JSON lines on stdout, and the same lines
/// appended to `<log_dir>/app.log` when a directory is given.
///
/// `RUST_LOG` wins over `log_level`. A log file that cannot be opened is
/// reported on stderr and skipped.
pub fn init_tracing(service_name: &str, log_level: &str, log_dir: Option<&Path>) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let file_layer = log_dir.and_then(|dir| match open_log_file(dir) {
        Ok(file) => Some(
            fmt::layer()
                .json()
                .flatten_event(true)
                .with_ansi(false)
                .with_writer(Arc::new(file)),
        ),
        Err(e) => {
            eprintln!(
                "Failed to open log file for service '{}' in '{}': {}",
                service_name,
                dir.display(),
                e
            );
            None
        }
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_file(true)
                .with_line_number(true)
                .json()
                .flatten_event(true),
        )
        .with(file_layer)
        .init();

    tracing::info!(service = service_name, "Tracing initialized");
}

/// Open `<dir>/app.log` for appending, creating the directory if needed.
pub fn open_log_file(dir: &Path) -> io::Result<File> {
    fs::create_dir_all(dir)?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE_NAME))
}
