use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_PREFIX: &str = "modalmask-demo.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// `EnvFilter` directive, e.g. `info` or `modalmask=debug`
    pub level: String,
    /// Daily-rotated log files go here when set
    pub file_dir: Option<String>,
}

pub struct FileLogGuard {
    _guard: WorkerGuard,
}

/// Install the global subscriber. Events go to stderr so stdout stays
/// machine-readable; the returned guard flushes the file writer on drop.
pub fn init_tracing(settings: &LogSettings) -> Option<FileLogGuard> {
    let env_filter = EnvFilter::try_new(&settings.level).unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(true);

    let mut guard = None;
    let file_layer = settings.file_dir.as_deref().and_then(|dir| {
        if let Err(err) = std::fs::create_dir_all(dir) {
            eprintln!("failed to create log directory {dir}: {err}");
            return None;
        }
        let appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
        let (writer, worker_guard) = tracing_appender::non_blocking(appender);
        guard = Some(FileLogGuard { _guard: worker_guard });
        Some(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}
