use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` overrides the default filter. JSON output is meant for log
/// collectors; the compact format is for terminals.
pub fn init_logger(verbose: bool, json: bool) {
    let default_filter = if verbose {
        "image_magic_lib=debug,image_magic_pro=debug,info"
    } else {
        "image_magic_lib=info,image_magic_pro=info,warn"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .json(),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_thread_names(false)
                    .with_file(false)
                    .with_line_number(false)
                    .with_ansi(true)
                    .compact(),
            )
            .init();
    }
}
