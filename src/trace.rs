use tracing::Level;
use tracing_subscriber::{filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Level for the `--verbose` flag.
pub fn log_level(verbose: bool) -> Level {
    if verbose {
        Level::DEBUG
    } else {
        Level::INFO
    }
}

/// Install the global subscriber: a fmt layer on stderr so stdout only carries
/// the progress lines and note listings.
pub fn init_tracing_subscriber(verbose: bool) {
    tracing_subscriber::registry()
        .with(LevelFilter::from_level(log_level(verbose)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}
