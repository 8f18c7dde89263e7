use tracing_subscriber::EnvFilter;

/// Default directive when `RUST_LOG` is unset or unparsable.
const DEFAULT_FILTER: &str = "info";

/// JSON lines for CloudWatch. The log group stamps ingestion time, so none is written here.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(true)
        .with_span_list(false)
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .with_line_number(true)
        .init();
}
