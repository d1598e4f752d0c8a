//! Memoized one-time engine initialization

use super::SimilarityEngine;
use crate::error::EngineInitError;
use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::{debug, warn};

type InitFn = Box<dyn Fn() -> Result<Arc<dyn SimilarityEngine>, EngineInitError> + Send + Sync>;

/// An engine that is built on first use.
///
/// The first caller runs the initializer; callers racing with it block until
/// that same run finishes. The outcome, success or failure, is kept for the
/// lifetime of the value and never retried.
pub struct LazyEngine {
    cell: OnceLock<Result<Arc<dyn SimilarityEngine>, EngineInitError>>,
    init: InitFn,
}

impl LazyEngine {
    pub fn new<F>(init: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn SimilarityEngine>, EngineInitError> + Send + Sync + 'static,
    {
        Self {
            cell: OnceLock::new(),
            init: Box::new(init),
        }
    }

    /// Already-initialized engine
    pub fn ready(engine: Arc<dyn SimilarityEngine>) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(Ok(engine));
        Self {
            cell,
            init: Box::new(unreachable_init),
        }
    }

    /// Get the engine, initializing it if this is the first call
    pub fn get(&self) -> Result<&Arc<dyn SimilarityEngine>, EngineInitError> {
        self.cell
            .get_or_init(|| {
                debug!("initializing similarity engine");
                let outcome = (self.init)();
                if let Err(e) = &outcome {
                    warn!(error = %e, "similarity engine initialization failed");
                }
                outcome
            })
            .as_ref()
            .map_err(Clone::clone)
    }

    /// True once initialization has run, whatever its outcome
    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl fmt::Debug for LazyEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.cell.get() {
            None => "pending",
            Some(Ok(engine)) => engine.name(),
            Some(Err(_)) => "failed",
        };
        f.debug_struct("LazyEngine").field("state", &state).finish()
    }
}

fn unreachable_init() -> Result<Arc<dyn SimilarityEngine>, EngineInitError> {
    // `ready` fills the cell before anyone can observe it empty
    Err(EngineInitError::Instantiate(
        "engine initializer invoked on a ready engine".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ReferenceEngine;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_concurrent_first_calls_share_one_load() {
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = loads.clone();
        let engine = Arc::new(LazyEngine::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(20));
            Ok(Arc::new(ReferenceEngine) as Arc<dyn SimilarityEngine>)
        }));

        let barrier = Arc::new(Barrier::new(8));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let engine = engine.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    engine.get().map(|e| e.name()).unwrap()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), "reference");
        }
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failure_is_memoized() {
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = loads.clone();
        let engine = LazyEngine::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(EngineInitError::Compile("bad magic".to_string()))
        });

        let first = engine.get().map(|_| ()).unwrap_err();
        let second = engine.get().map(|_| ()).unwrap_err();
        assert_eq!(first, second);
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_ready_engine() {
        let engine = LazyEngine::ready(Arc::new(ReferenceEngine));
        assert!(engine.is_initialized());
        assert_eq!(format!("{:?}", engine), "LazyEngine { state: \"reference\" }");
    }
}
