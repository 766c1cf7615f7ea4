//! Helpers shared by the demo binaries.

/// Install a `tracing` subscriber printing `info` and above, or whatever
/// `RUST_LOG`-style level is given in `LEDGERQ_LOG`.
pub fn setup_logger() {
    let level = std::env::var("LEDGERQ_LOG")
        .ok()
        .and_then(|value| value.parse::<tracing::Level>().ok())
        .unwrap_or(tracing::Level::INFO);

    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init();
}
