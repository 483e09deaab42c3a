use {
    std::sync::Once,
    tracing_subscriber::{EnvFilter, fmt, prelude::*},
};

#[derive(Clone, Debug)]
pub struct Config {
    /// `RUST_LOG` style directives, e.g. `warn,savings=debug`.
    pub env_filter: String,
    /// Emit one JSON object per event instead of human readable lines.
    pub use_json: bool,
}

impl Config {
    pub fn new(env_filter: &str, use_json: bool) -> Self {
        Self {
            env_filter: env_filter.to_owned(),
            use_json,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new("info", false)
    }
}

/// Initializes the global tracing subscriber and the panic hook.
///
/// Panics if a global subscriber was already set; use
/// [`initialize_reentrant`] where that can legitimately happen (tests).
pub fn initialize(config: &Config) {
    if let Err(err) = set_tracing_subscriber(config) {
        panic!("failed to initialize tracing: {err}");
    }
    crate::panic_hook::install();
}

/// Like [`initialize`] but only the first call has an effect.
pub fn initialize_reentrant(config: &Config) {
    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        // Another test harness may have installed a subscriber already.
        let _ = set_tracing_subscriber(config);
    });
}

fn set_tracing_subscriber(
    config: &Config,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_new(&config.env_filter).unwrap_or_else(|err| {
        eprintln!(
            "invalid log filter {:?} ({err}), falling back to \"info\"",
            config.env_filter
        );
        EnvFilter::new("info")
    });
    let registry = tracing_subscriber::registry().with(filter);
    if config.use_json {
        registry
            .with(fmt::layer().json().with_current_span(true))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_ansi(atty::is(atty::Stream::Stdout)))
            .try_init()
    }
}
