pub mod env;
pub mod eval;
pub mod lex;
pub mod session;

/// The representation used by all numbers and their arithmetic operations.
pub type CalcNumber = f64;

/// Sends `tracing` output to stderr, filtered by `RUST_LOG` (warnings and up by default).
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
