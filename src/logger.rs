use env_logger::{Builder, Env, Target};

/// Environment variable holding the log filter, in env_logger syntax.
pub const LOG_ENV: &str = "EMPSEED_LOG";
const DEFAULT_FILTER: &str = "warn";

/// Route `log` records to stderr so stdout carries only progress lines.
/// Calling this more than once is harmless.
pub fn init() {
    let env = Env::new().filter_or(LOG_ENV, DEFAULT_FILTER);
    let _ = Builder::from_env(env)
        .target(Target::Stderr)
        .format_timestamp_millis()
        .try_init();
}
