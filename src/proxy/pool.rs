//! Backend pool and round-robin peer selection
//!
//! The pool holds the fixed, ordered backend list and the shared rotation
//! cursor. Selection is lock-free: the cursor is advanced with a single
//! atomic increment, and liveness flags are read through each backend's
//! own atomic cell.

use crate::proxy::backend::Backend;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Ordered collection of backends plus the rotation cursor.
#[derive(Debug)]
pub struct ServerPool {
    /// Insertion order is configuration order; never resized at runtime.
    backends: Vec<Arc<Backend>>,

    /// Monotonically increasing rotation counter. Owned exclusively by
    /// the pool and mutated only through `select_next`.
    cursor: AtomicUsize,
}

impl ServerPool {
    pub fn new(backends: Vec<Backend>) -> Self {
        Self {
            backends: backends.into_iter().map(Arc::new).collect(),
            cursor: AtomicUsize::new(0),
        }
    }

    /// Number of configured backends.
    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    /// All backends in configuration order (for monitoring/debugging).
    pub fn backends(&self) -> &[Arc<Backend>] {
        &self.backends
    }

    /// Select the next alive backend using round-robin.
    ///
    /// The cursor is atomically incremented and reduced modulo the pool
    /// size to derive the starting index, so two concurrent callers never
    /// derive the same post-increment value from the same pre-increment
    /// state. The scan then walks at most one full lap, skipping backends
    /// that are not alive, and returns the first alive candidate. When the
    /// scan wrapped past the end, the cursor is advanced to the found
    /// index so subsequent rotations continue from there; this is
    /// best-effort, not required for correctness.
    ///
    /// Returns `None` when the pool is empty or no backend in one full
    /// lap is alive.
    pub fn select_next(&self) -> Option<Arc<Backend>> {
        let len = self.backends.len();
        if len == 0 {
            return None;
        }

        let next = self.cursor.fetch_add(1, Ordering::Relaxed).wrapping_add(1) % len;

        for offset in 0..len {
            let raw = next + offset;
            let index = raw % len;

            if self.backends[index].is_alive() {
                if raw != index {
                    self.cursor.store(index, Ordering::Relaxed);
                }
                return Some(Arc::clone(&self.backends[index]));
            }
        }

        tracing::error!("No alive backends in pool");
        None
    }

    /// Count of currently alive backends.
    pub fn alive_count(&self) -> usize {
        self.backends.iter().filter(|b| b.is_alive()).count()
    }
}
