use esignbridge_domain::{EsignBridgeError, LogFormat, LoggingConfig};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

const LOG_FILE_PREFIX: &str = "esignbridge.log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. When a log
/// directory is configured, output is also written to a daily-rotated file;
/// the returned guard must be held until shutdown so buffered lines are
/// flushed.
pub fn init_tracing(config: &LoggingConfig) -> Result<Option<WorkerGuard>, EsignBridgeError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level).map_err(|err| {
            EsignBridgeError::Config(format!("invalid log level '{}': {err}", config.level))
        })?,
    };

    let mut layers: Vec<BoxedLayer> = vec![fmt_layer(config.format, std::io::stdout, true)];

    let guard = match &config.directory {
        Some(directory) if !directory.is_empty() => {
            std::fs::create_dir_all(directory).map_err(|err| {
                EsignBridgeError::Config(format!("cannot create log directory {directory}: {err}"))
            })?;
            let appender = tracing_appender::rolling::daily(directory, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            layers.push(fmt_layer(config.format, writer, false));
            Some(guard)
        }
        _ => None,
    };

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|err| EsignBridgeError::Config(format!("failed to install subscriber: {err}")))?;

    Ok(guard)
}

fn fmt_layer<W>(format: LogFormat, writer: W, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(ansi).with_target(true);
    match format {
        LogFormat::Json => layer.json().boxed(),
        LogFormat::Text => layer.boxed(),
    }
}

/// Convert an `EsignBridgeError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &EsignBridgeError) -> &'static str {
    match error {
        EsignBridgeError::Validation(_) => "validation",
        EsignBridgeError::NotFound(_) => "not_found",
        EsignBridgeError::Upstream { .. } => "upstream",
        EsignBridgeError::Io(_) => "io",
        EsignBridgeError::Network(_) => "network",
        EsignBridgeError::Auth(_) => "auth",
        EsignBridgeError::Config(_) => "config",
        EsignBridgeError::Database(_) => "database",
        EsignBridgeError::Cache(_) => "cache",
        EsignBridgeError::Internal(_) => "internal",
    }
}
