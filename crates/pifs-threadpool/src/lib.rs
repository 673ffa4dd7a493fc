//! Worker pool that fans the encoder's row bands out across CPU cores.
//!
//! The pool is a thin layer over `rayon-core`. Builds without the `rayon`
//! feature, and pools whose construction fails, degrade to running every
//! task on the calling thread; callers never need to distinguish the two.

#[derive(Debug, Clone)]
pub struct PifsThreadPool {
    backend: Backend,
}

#[derive(Debug, Clone)]
enum Backend {
    #[cfg(feature = "rayon")]
    Pool(std::sync::Arc<rayon_core::ThreadPool>),
    Inline,
}

impl Default for PifsThreadPool {
    fn default() -> Self {
        Self::new()
    }
}

impl PifsThreadPool {
    /// Create a pool with one worker per available CPU core.
    #[cfg(feature = "rayon")]
    pub fn new() -> Self {
        match std::thread::available_parallelism() {
            Ok(cores) => Self::with_threads(cores.into()),
            Err(e) => {
                tracing::warn!(%e, "CPU count unavailable, encoding on one thread");
                Self::serial()
            }
        }
    }

    /// Create a pool with one worker per available CPU core.
    #[cfg(not(feature = "rayon"))]
    pub fn new() -> Self {
        tracing::debug!("worker pool support compiled out, encoding on one thread");
        Self::serial()
    }

    /// Create a pool with an exact worker count.
    #[cfg(feature = "rayon")]
    pub fn with_threads(count: usize) -> Self {
        let pool = rayon_core::ThreadPoolBuilder::new()
            .num_threads(count)
            .build();
        match pool {
            Ok(pool) => {
                tracing::debug!(count, "worker pool ready");
                Self {
                    backend: Backend::Pool(std::sync::Arc::new(pool)),
                }
            }
            Err(e) => {
                tracing::warn!(%e, "worker pool construction failed, encoding on one thread");
                Self::serial()
            }
        }
    }

    /// Create a pool that runs every task on the calling thread.
    pub const fn serial() -> Self {
        Self {
            backend: Backend::Inline,
        }
    }

    pub fn is_multithreaded(&self) -> bool {
        self.num_workers() > 1
    }

    /// Number of workers tasks are scheduled onto.
    pub fn num_workers(&self) -> usize {
        match &self.backend {
            #[cfg(feature = "rayon")]
            Backend::Pool(pool) => pool.current_num_threads(),
            Backend::Inline => 1,
        }
    }

    /// Run `op` once per slot, handing each invocation exclusive access to
    /// its slot, and return once every invocation has finished.
    ///
    /// Invocations may run concurrently and in any order. Callers that need
    /// deterministic output must keep each slot self-contained and combine
    /// the slots only after this returns.
    pub fn for_each_slot<T: Send>(
        &self,
        slots: &mut [T],
        op: impl Fn(usize, &mut T) + Send + Sync,
    ) {
        match &self.backend {
            #[cfg(feature = "rayon")]
            Backend::Pool(pool) => {
                let op = &op;
                pool.scope(|scope| {
                    for (index, slot) in slots.iter_mut().enumerate() {
                        scope.spawn(move |_| op(index, slot));
                    }
                });
            }
            Backend::Inline => {
                for (index, slot) in slots.iter_mut().enumerate() {
                    op(index, slot);
                }
            }
        }
    }
}
