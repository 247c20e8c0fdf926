use log::LevelFilter;

/// `debug` raises everything to debug; otherwise info, with the HTTP
/// internals kept at warn.
pub fn init_logging(debug: bool) {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    if !debug {
        builder
            .filter_module("reqwest", LevelFilter::Warn)
            .filter_module("hyper", LevelFilter::Warn);
    }
    builder.format_timestamp_millis().init();
}
