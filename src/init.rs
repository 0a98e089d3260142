// Tracing initialization for the operator CLI.
//
// Env-filter driven, idempotent, defaults to "info" when RUST_LOG is unset
// — the same shape as the teacher's `init_tracing`, minus the JSON/text
// format switch since the CLI has no `ServerConfig` to read it from.

pub fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer())
        .try_init();
}
