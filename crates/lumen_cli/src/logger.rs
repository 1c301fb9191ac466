use log::LevelFilter;

/// Initialize the logger at `level`. `RUST_LOG` directives still apply on
/// top of it.
pub fn init_logger(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}
