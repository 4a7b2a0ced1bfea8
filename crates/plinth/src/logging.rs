use plinth_install::{InstallHook, Phase, Warning};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `-v` flags win over `RUST_LOG`, which wins
/// over the default of `plinth=info`.
pub fn init(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("plinth=info")),
        1 => EnvFilter::new("plinth=debug"),
        _ => EnvFilter::new("plinth=trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Forwards lifecycle events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingHook;

impl InstallHook for TracingHook {
    fn phase(&self, plugin: &str, phase: Phase) { debug!(plugin, %phase, "phase"); }

    fn warning(&self, plugin: &str, warning: &Warning) { warn!(plugin, "{warning}"); }
}
