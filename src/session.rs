//! Lazily created, long-lived engine session.

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};
use tracing::{debug, error};

use crate::engine::Engine;
use crate::error::{Error, Result};

/// Builds and initializes an engine
pub type Factory<E> = fn() -> Result<E>;

/// Holds at most one engine, created on first use and kept for the life of
/// the session.
///
/// One lock covers both the check-and-set of the lazy slot and every decode
/// pass run through the returned guard, so a session can sit in a `static`
/// and be shared by any number of threads.
pub struct Session<E> {
    slot: Mutex<Option<E>>,
    factory: Factory<E>,
    created: AtomicUsize,
}

impl<E: Engine> Session<E> {
    pub const fn new(factory: Factory<E>) -> Self {
        Self {
            slot: parking_lot::const_mutex(None),
            factory,
            created: AtomicUsize::new(0),
        }
    }

    /// Lock the session, creating the engine if this is the first
    /// successful call.
    ///
    /// A failed creation leaves the slot empty; the next call tries again.
    pub fn get_or_create(&self) -> Result<MappedMutexGuard<'_, E>> {
        let mut slot = self.slot.lock();
        if slot.is_none() {
            let engine = (self.factory)().inspect_err(|err| {
                error!(%err, "engine creation failed");
            })?;
            let n = self.created.fetch_add(1, Ordering::Relaxed) + 1;
            debug!(creations = n, version = %engine.version(), "engine created");
            *slot = Some(engine);
        }
        MutexGuard::try_map(slot, Option::as_mut)
            .map_err(|_| Error::EngineInit("engine slot empty after creation".to_string()))
    }

    /// Engines created so far
    pub fn creations(&self) -> usize {
        self.created.load(Ordering::Relaxed)
    }

    pub fn is_initialized(&self) -> bool {
        self.slot.lock().is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicBool;

    use super::*;
    use crate::engine::{EngineVersion, Image};
    use crate::models::Symbol;

    struct NullEngine;

    impl Engine for NullEngine {
        fn process(&mut self, _image: &Image<'_>) -> Result<Vec<Symbol>> {
            Ok(Vec::new())
        }

        fn version(&self) -> EngineVersion {
            EngineVersion {
                major: 1,
                minor: 0,
                patch: 0,
            }
        }
    }

    fn ok_factory() -> Result<NullEngine> {
        Ok(NullEngine)
    }

    static FAILED_ONCE: AtomicBool = AtomicBool::new(false);

    fn flaky_factory() -> Result<NullEngine> {
        if FAILED_ONCE.swap(true, Ordering::SeqCst) {
            Ok(NullEngine)
        } else {
            Err(Error::EngineInit("first attempt fails".to_string()))
        }
    }

    #[test]
    fn test_engine_created_once() {
        let session = Session::new(ok_factory);
        assert!(!session.is_initialized());
        for _ in 0..3 {
            let engine = session.get_or_create().unwrap();
            assert_eq!(engine.version().major, 1);
        }
        assert!(session.is_initialized());
        assert_eq!(session.creations(), 1);
    }

    #[test]
    fn test_failed_creation_is_retried() {
        let session = Session::new(flaky_factory);
        assert!(matches!(session.get_or_create(), Err(Error::EngineInit(_))));
        assert!(!session.is_initialized());
        assert_eq!(session.creations(), 0);

        assert!(session.get_or_create().is_ok());
        assert_eq!(session.creations(), 1);
    }

    #[test]
    fn test_shared_across_threads() {
        static SHARED: Session<NullEngine> = Session::new(ok_factory);
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    let _engine = SHARED.get_or_create().unwrap();
                });
            }
        });
        assert_eq!(SHARED.creations(), 1);
    }
}
