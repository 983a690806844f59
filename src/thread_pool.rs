//! Shared thread pool for evaluating outcome regions in parallel.
//!
//! Every region is an independent integral, so the pool only ever runs a
//! parallel map; the reduction happens afterwards on the calling thread.

use rayon::ThreadPool;

use std::sync::OnceLock;

static THREAD_POOL: OnceLock<Option<ThreadPool>> = OnceLock::new();

/// Get or initialize the shared pool. `None` if the pool could not be
/// built, in which case work runs on rayon's global pool.
fn get_thread_pool() -> Option<&'static ThreadPool> {
    THREAD_POOL
        .get_or_init(|| {
            rayon::ThreadPoolBuilder::new()
                .thread_name(|i| format!("mams-power-{i}"))
                .build()
                .map_err(|e| tracing::warn!(error = %e, "falling back to global rayon pool"))
                .ok()
        })
        .as_ref()
}

/// Execute a parallel operation using the shared pool.
pub(crate) fn install<OP, R>(op: OP) -> R
where
    OP: FnOnce() -> R + Send,
    R: Send,
{
    match get_thread_pool() {
        Some(pool) => pool.install(op),
        None => op(),
    }
}
