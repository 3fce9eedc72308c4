//! Worker counts read from `GRAPHKIT_THREADS` when building run configs.

use std::{
    env,
    num::NonZeroUsize,
    sync::{Mutex, PoisonError},
};

use graphkit_adapter::{OperationError, OperationErrorCode, Options};
use graphkit_engine::{EngineError, THREADS_ENV};
use rstest::rstest;

static ENV_LOCK: Mutex<()> = Mutex::new(());

struct EnvGuard {
    key: &'static str,
    original: Option<String>,
}

impl EnvGuard {
    fn set(key: &'static str, value: &str) -> Self {
        let original = env::var(key).ok();
        // SAFETY: tests serialize access with ENV_LOCK.
        unsafe { env::set_var(key, value) };
        Self { key, original }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        if let Some(value) = &self.original {
            // SAFETY: tests serialize access with ENV_LOCK.
            unsafe { env::set_var(self.key, value) };
        } else {
            // SAFETY: tests serialize access with ENV_LOCK.
            unsafe { env::remove_var(self.key) };
        }
    }
}

#[rstest]
#[case("0")]
#[case("lots")]
#[case("-3")]
fn invalid_thread_counts_surface_as_engine_errors(#[case] raw: &str) {
    let _lock = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    let _threads = EnvGuard::set(THREADS_ENV, raw);

    let err = Options::default()
        .run_config()
        .expect_err("thread count is rejected");
    assert_eq!(err.code(), OperationErrorCode::EngineFailure);
    assert!(matches!(
        err,
        OperationError::Engine(EngineError::InvalidThreadCount { ref value }) if &**value == raw
    ));
}

#[test]
fn valid_thread_counts_size_the_run() {
    let _lock = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    let _threads = EnvGuard::set(THREADS_ENV, "3");

    let config = Options::default().run_config().expect("three workers");
    assert_eq!(config.threads(), NonZeroUsize::new(3).expect("three is non-zero"));
}
