use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn default_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("jsonl_harvest=debug,info")
        } else {
            EnvFilter::new("jsonl_harvest=info")
        }
    })
}

pub fn init_cli_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(default_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// JSON output for runs whose logs are collected by another program.
pub fn init_json_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(default_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .init();
}

/// `level` from a config file wins over `--verbose` but not over `RUST_LOG`.
pub fn init_with_level(level: Option<&str>, verbose: bool, json: bool) {
    match level {
        Some(level) if std::env::var("RUST_LOG").is_err() => {
            let filter = EnvFilter::new(format!("jsonl_harvest={}", level));
            let fmt_layer = tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false);
            if json {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer.json())
                    .init();
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer.compact())
                    .init();
            }
        }
        _ if json => init_json_logger(verbose),
        _ => init_cli_logger(verbose),
    }
}
