//! Fault containment for operation handlers.
//!
//! [`contain`] runs a handler under [`std::panic::catch_unwind`] and turns a
//! panic into [`OperationError::Fault`]. Each call opens a scope with a fresh
//! id. A process-wide panic hook, installed on first use, records a backtrace
//! at the panic site when the panicking thread belongs to an open scope:
//! either the thread that opened it, or an engine worker whose run was tagged
//! with the scope id (see [`current_scope`]). Other panics are forwarded to
//! the hook that was installed before.

use std::{
    any::Any,
    backtrace::Backtrace,
    cell::Cell,
    collections::HashMap,
    panic::{self, AssertUnwindSafe},
    sync::{
        Arc, Mutex, MutexGuard, Once, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
};

use graphkit_engine::current_worker_tag;
use tracing::{error, warn};

use crate::error::{OperationError, Result};

const BACKTRACE_UNAVAILABLE: &str = "<backtrace unavailable: panic raised outside the operation>";

static HOOK: Once = Once::new();
static NEXT_SCOPE: AtomicU64 = AtomicU64::new(1);

/// Latest panic recorded in each open scope. Entries exist only while the
/// scope is open.
static TRACES: Mutex<Option<HashMap<u64, Option<Recorded>>>> = Mutex::new(None);

/// Panic message and backtrace captured at the panic site.
struct Recorded {
    message: String,
    backtrace: String,
}

thread_local! {
    static CURRENT_SCOPE: Cell<Option<u64>> = const { Cell::new(None) };
}

fn traces() -> MutexGuard<'static, Option<HashMap<u64, Option<Recorded>>>> {
    TRACES.lock().unwrap_or_else(PoisonError::into_inner)
}

fn install_hook() {
    HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let scope = CURRENT_SCOPE.with(Cell::get).or_else(current_worker_tag);
            let recorded = scope.is_some_and(|scope| {
                let panic = Recorded {
                    message: panic_message(info.payload()),
                    backtrace: Backtrace::force_capture().to_string(),
                };
                traces()
                    .as_mut()
                    .and_then(|open| open.get_mut(&scope))
                    .map(|slot| *slot = Some(panic))
                    .is_some()
            });
            if !recorded {
                previous(info);
            }
        }));
    });
}

/// Returns the id of the innermost containment scope on this thread.
///
/// Engine runs tagged with this id (see
/// [`graphkit_engine::RunConfig::with_worker_tag`]) have panics on their
/// worker threads attributed to the scope.
#[must_use]
pub fn current_scope() -> Option<u64> {
    CURRENT_SCOPE.with(Cell::get)
}

/// Open containment scope; closing it discards any recorded backtrace.
struct ScopeGuard {
    id: u64,
    outer: Option<u64>,
}

impl ScopeGuard {
    fn enter() -> Self {
        let id = NEXT_SCOPE.fetch_add(1, Ordering::Relaxed);
        traces().get_or_insert_with(HashMap::new).insert(id, None);
        let outer = CURRENT_SCOPE.with(|current| current.replace(Some(id)));
        Self { id, outer }
    }

    /// Takes the recorded backtrace if it belongs to the panic with
    /// `message`. A panic caught earlier inside the scope leaves a record for
    /// a different panic, which is discarded.
    fn take_backtrace(&self, message: &str) -> Option<String> {
        traces()
            .as_mut()
            .and_then(|open| open.get_mut(&self.id))
            .and_then(Option::take)
            .filter(|recorded| recorded.message == message)
            .map(|recorded| recorded.backtrace)
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        CURRENT_SCOPE.with(|current| current.set(self.outer));
        if let Some(open) = traces().as_mut() {
            open.remove(&self.id);
        }
    }
}

/// Runs `body`, converting a panic into [`OperationError::Fault`].
///
/// Faults are logged at `error` level with the panic message and backtrace;
/// ordinary errors are logged at `warn` level. Both are returned to the
/// caller and the process keeps running.
///
/// # Errors
/// Returns the error produced by `body`, or [`OperationError::Fault`] when
/// `body` panics.
///
/// # Examples
/// ```
/// use graphkit_adapter::{OperationError, fault::contain};
///
/// let outcome: Result<(), _> = contain("demo", || panic!("boom"));
/// match outcome {
///     Err(OperationError::Fault { message, .. }) => assert_eq!(message, "boom"),
///     other => panic!("expected a fault, got {other:?}"),
/// }
/// ```
pub fn contain<T>(operation: &str, body: impl FnOnce() -> Result<T>) -> Result<T> {
    install_hook();
    let scope = ScopeGuard::enter();
    let outcome = panic::catch_unwind(AssertUnwindSafe(body));
    let outcome = outcome.map_err(|payload| {
        let message = panic_message(payload.as_ref());
        let backtrace = scope.take_backtrace(&message);
        (message, backtrace)
    });
    drop(scope);

    match outcome {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => {
            warn!(
                operation,
                code = err.code().as_str(),
                error = %err,
                "operation failed"
            );
            Err(err)
        }
        Err((message, backtrace)) => {
            let backtrace = backtrace.unwrap_or_else(|| BACKTRACE_UNAVAILABLE.to_owned());
            error!(
                operation,
                code = "OPERATION_FAULT",
                panic = %message,
                backtrace = %backtrace,
                "operation faulted; panic contained"
            );
            Err(OperationError::Fault {
                operation: operation.to_owned(),
                message,
                backtrace: Arc::from(backtrace),
            })
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::num::NonZeroUsize;

    use graphkit_engine::{EngineError, RunConfig};

    #[test]
    fn successful_bodies_pass_through() {
        assert_eq!(contain("ok", || Ok(7)), Ok(7));
    }

    #[test]
    fn errors_pass_through_unchanged() {
        let outcome: Result<()> = contain("err", || Err(EngineError::EdgesNotIndexed.into()));
        assert_eq!(
            outcome,
            Err(OperationError::Engine(EngineError::EdgesNotIndexed))
        );
    }

    #[test]
    fn panics_become_faults_with_backtraces() {
        let outcome: Result<()> = contain("explode", || panic!("bad {}", "input"));
        match outcome {
            Err(OperationError::Fault {
                operation,
                message,
                backtrace,
            }) => {
                assert_eq!(operation, "explode");
                assert_eq!(message, "bad input");
                assert!(!backtrace.is_empty());
                assert_ne!(&*backtrace, BACKTRACE_UNAVAILABLE);
            }
            other => panic!("expected a fault, got {other:?}"),
        }
    }

    fn is_open(scope: u64) -> bool {
        traces().as_ref().is_some_and(|open| open.contains_key(&scope))
    }

    #[test]
    fn scopes_close_after_a_fault() {
        let mut seen = None;
        let _: Result<()> = contain("explode", || {
            seen = current_scope();
            panic!("boom")
        });
        let scope = seen.expect("body runs inside a scope");
        assert!(!is_open(scope));
        assert_eq!(current_scope(), None);
    }

    #[test]
    fn each_call_opens_a_fresh_scope() {
        let first = contain("first", || Ok(current_scope()));
        let second = contain("second", || Ok(current_scope()));
        assert!(first.as_ref().is_ok_and(Option::is_some));
        assert_ne!(first, second);
    }

    #[test]
    fn worker_panics_carry_the_worker_backtrace() {
        let outcome: Result<()> = contain("worker", || {
            let scope = current_scope().expect("inside a scope");
            let config = RunConfig::new(1)
                .with_threads(NonZeroUsize::MIN)
                .with_worker_tag(scope);
            let pool = config.thread_pool()?;
            pool.install(|| -> Result<()> { panic!("worker {}", "exploded") })
        });
        match outcome {
            Err(OperationError::Fault {
                message, backtrace, ..
            }) => {
                assert_eq!(message, "worker exploded");
                assert!(!backtrace.is_empty());
                assert_ne!(&*backtrace, BACKTRACE_UNAVAILABLE);
            }
            other => panic!("expected a fault, got {other:?}"),
        }
    }

    #[test]
    fn swallowed_panics_do_not_stand_in_for_later_faults() {
        let outcome: Result<()> = contain("stale", || {
            let swallowed: std::thread::Result<()> =
                std::panic::catch_unwind(|| panic!("swallowed"));
            assert!(swallowed.is_err());
            let untracked: std::thread::Result<()> =
                std::thread::spawn(|| panic!("untracked")).join();
            match untracked {
                Err(payload) => std::panic::resume_unwind(payload),
                Ok(()) => Ok(()),
            }
        });
        match outcome {
            Err(OperationError::Fault {
                message, backtrace, ..
            }) => {
                assert_eq!(message, "untracked");
                assert_eq!(&*backtrace, BACKTRACE_UNAVAILABLE);
            }
            other => panic!("expected a fault, got {other:?}"),
        }
    }

    #[test]
    fn nested_scopes_contain_inner_panics() {
        let outer = contain("outer", || {
            let inner: Result<()> = contain("inner", || panic!("inner boom"));
            assert!(inner.as_ref().is_err_and(OperationError::is_fault));
            Ok(1)
        });
        assert_eq!(outer, Ok(1));
    }

    #[test]
    fn non_string_payloads_are_described() {
        let outcome: Result<()> = contain("payload", || std::panic::panic_any(42_u8));
        assert!(matches!(
            outcome,
            Err(OperationError::Fault { ref message, .. }) if message == "non-string panic payload"
        ));
    }
}
