use env_logger::Env;

/// GPU and windowing internals are noisy at `info`; keep them at `warn`
/// unless `RUST_LOG` overrides the whole filter.
const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn,calloop=warn";

pub fn init_logger() {
    env_logger::Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER))
        .format_timestamp_millis()
        .init();
}
