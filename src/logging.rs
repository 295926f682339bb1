use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// tracing 구독자를 설정한다. `RUST_LOG`가 있으면 그 값을, 없으면 `default_level`을 쓴다.
///
/// 두 번째 호출부터는 아무 것도 하지 않는다.
pub fn init(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init();
}
