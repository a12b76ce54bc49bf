use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Initialise logging. The default level is `info`; with `debug` set it is
/// `debug` and can be overridden via the `RUST_LOG` environment variable.
/// When `log_file` is given, output goes to that file instead of stderr
/// through a background writer. Keep the returned guard alive for as long as
/// logging is needed; dropping it flushes pending lines.
#[must_use = "dropping the guard stops the file writer"]
pub fn init(debug: bool, log_file: Option<PathBuf>) -> Option<WorkerGuard> {
    // Without debug logging `RUST_LOG` is ignored so a stray variable in the
    // user's environment cannot flood the terminal while recording.
    let level = if debug { "debug" } else { "info" };

    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let file_parts = log_file.as_ref().and_then(|path| {
        let dir = path.parent()?.to_path_buf();
        let name = path.file_name()?.to_os_string();
        Some((dir, name))
    });

    match file_parts {
        Some((dir, name)) => {
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
            builder.with_ansi(false).with_writer(writer).try_init().ok()?;
            Some(guard)
        }
        None => {
            let _ = builder.try_init();
            None
        }
    }
}
