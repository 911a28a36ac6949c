use std::io::IsTerminal;

use schema_graph_config::log::{LogFormat, LoggingConfig};
use tracing_subscriber::{
    fmt::{self, time::UtcTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Installs the global subscriber. Everything goes to stderr so that stdout
/// only carries command output.
pub fn init(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(config.env_filter_str())?;
    let registry = tracing_subscriber::registry();
    let is_terminal = std::io::stderr().is_terminal();

    match config.format {
        LogFormat::PrettyTree => registry
            .with(
                tracing_tree::HierarchicalLayer::new(2)
                    .with_writer(std::io::stderr)
                    .with_ansi(is_terminal)
                    .with_bracketed_fields(true)
                    .with_deferred_spans(false)
                    .with_wraparound(25)
                    .with_indent_lines(true)
                    .with_timer(tracing_tree::time::Uptime::default())
                    .with_thread_names(false)
                    .with_thread_ids(false)
                    .with_targets(false),
            )
            .with(filter)
            .try_init()?,
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_timer(UtcTime::rfc_3339()),
            )
            .with(filter)
            .try_init()?,
        LogFormat::PrettyCompact => registry
            .with(
                fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr)
                    .with_ansi(is_terminal)
                    .with_timer(UtcTime::rfc_3339()),
            )
            .with(filter)
            .try_init()?,
    };

    Ok(())
}
