use tracing_subscriber::EnvFilter;

/// RUST_LOG 기반 로그 구독자를 설치한다. 지정이 없으면 warn 이상만 stderr로 출력한다.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
