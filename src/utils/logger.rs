use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::fmt::writer::{EitherWriter, MakeWriter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Opens the log file in append mode for every event, so each line is
/// written and closed on its own. The file stays free to be rotated or
/// removed between two events, which a long-lived appender handle is not.
#[derive(Debug, Clone)]
pub struct AppendFile {
    path: PathBuf,
}

impl AppendFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl<'a> MakeWriter<'a> for AppendFile {
    type Writer = EitherWriter<File, io::Sink>;

    fn make_writer(&'a self) -> Self::Writer {
        match OpenOptions::new().create(true).append(true).open(&self.path) {
            Ok(file) => EitherWriter::A(file),
            Err(e) => {
                eprintln!("cannot open log file {}: {}", self.path.display(), e);
                EitherWriter::B(io::sink())
            }
        }
    }
}

/// Plain-text file layer: one bare message per line (no timestamp, level or
/// colours), our own events at INFO and up.
pub fn file_layer<S>(log_path: &Path) -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'span> tracing_subscriber::registry::LookupSpan<'span>,
{
    tracing_subscriber::fmt::layer()
        .with_writer(AppendFile::new(log_path))
        .with_ansi(false)
        .without_time()
        .with_level(false)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_filter(Targets::new().with_target("horizon_csv", Level::INFO))
}

/// Subscriber that only writes to the log file, used where a process-wide
/// console logger is not wanted.
pub fn file_subscriber(log_path: &Path) -> impl tracing::Subscriber + Send + Sync {
    tracing_subscriber::registry().with(file_layer(log_path))
}

pub fn init_cli_logger(log_path: &Path, verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("horizon_csv=debug,info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("horizon_csv=info"))
    };

    tracing_subscriber::registry()
        .with(file_layer(log_path))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact()
                .with_filter(filter),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_subscriber_appends_plain_lines() {
        let dir = TempDir::new().unwrap();
        let log_path = dir.path().join("logs.txt");
        std::fs::write(&log_path, "existing line\n").unwrap();

        tracing::subscriber::with_default(file_subscriber(&log_path), || {
            tracing::info!("Scraping transaction list {}", "https://example.com/transactions");
            tracing::warn!("Failed get line abc (attempt 1/3)");
            tracing::debug!("not written");
        });

        let content = std::fs::read_to_string(&log_path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines,
            vec![
                "existing line",
                "Scraping transaction list https://example.com/transactions",
                "Failed get line abc (attempt 1/3)",
            ]
        );
    }
}
