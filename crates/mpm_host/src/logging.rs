use env_logger::Builder;
use log::LevelFilter;

/// Installs the global logger.
///
/// Progress and completion messages are logged at `info`; `RUST_LOG`
/// overrides the default level.
pub fn init() {
    Builder::new()
        .filter_level(LevelFilter::Info)
        .format_target(false)
        .parse_default_env()
        .init();
}
