use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Initialize logging for binaries and tests.
///
/// Reads the filter from `RUST_LOG` and writes to stderr so stdout stays
/// free for program output. Safe to call more than once; only the first
/// call installs a subscriber.
pub fn init_logging() {
    INIT.call_once(|| {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .with_target(false)
            .finish();

        // A subscriber may already be installed by the embedding
        // application; that one wins.
        if tracing::subscriber::set_global_default(subscriber).is_err() {
            eprintln!("Warning: logger initialization skipped, subscriber already set");
        }
    });
}
