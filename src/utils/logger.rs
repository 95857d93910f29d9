use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Compact human-readable logs on stderr. `RUST_LOG` wins over `level`.
pub fn init_cli_logger(level: &str) {
    tracing_subscriber::registry()
        .with(default_filter(level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// JSON lines on stderr, for log shippers.
pub fn init_json_logger(level: &str) {
    tracing_subscriber::registry()
        .with(default_filter(level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .init();
}

fn default_filter(level: &str) -> EnvFilter {
    // stdout carries command output, so logs always go to stderr
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_directive(level)))
}

fn filter_directive(level: &str) -> String {
    match level {
        "trace" | "debug" => format!("recipe_book={level},info"),
        _ => format!("recipe_book={level}"),
    }
}

#[cfg(test)]
mod tests {
    use super::filter_directive;

    #[test]
    fn test_filter_directive_keeps_dependencies_at_info_when_verbose() {
        assert_eq!(filter_directive("debug"), "recipe_book=debug,info");
        assert_eq!(filter_directive("warn"), "recipe_book=warn");
    }
}
