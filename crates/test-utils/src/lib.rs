pub mod builders;
pub mod models;

use std::sync::Once;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt};

static INIT: Once = Once::new();

/// Route `jsonfig`'s tracing events into the test harness output.
///
/// Safe to call from every test; only the first call installs a subscriber.
/// The filter comes from `RUST_LOG` and falls back to `info`, so the
/// repository's `debug!` events (argument list, resolved path) show up with
/// `RUST_LOG=jsonfig=debug`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::INFO.into())
            .from_env_lossy();

        let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
    });
}
