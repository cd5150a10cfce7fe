use log::LevelFilter;

/// Console logging; `info` unless `RUST_LOG` says otherwise.
pub fn init() {
    let _ = env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}
