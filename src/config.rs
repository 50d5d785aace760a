//! The in-process nature of this hub rules out environment- or
//! filesystem-driven configuration (there's no deployment to parameterize);
//! what remains is the one tunable spec exposes, centralized here in the
//! teacher's spirit of keeping such knobs in a single module rather than
//! scattered as magic numbers.

/// Capacity the non-blocking adapter falls back to when the caller passes a
/// non-positive value.
pub const DEFAULT_NONBLOCKING_CAPACITY: i64 = 10;

/// Initializes a `tracing` subscriber for test binaries, idempotently.
#[cfg(test)]
pub fn init_test_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
