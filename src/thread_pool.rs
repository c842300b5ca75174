use once_cell::sync::OnceCell;
use rayon::ThreadPoolBuilder;
use std::sync::Arc;

/// Pool used for per-file hashing.
static THREAD_POOL: OnceCell<Arc<rayon::ThreadPool>> = OnceCell::new();

/// Default worker count: available CPUs, capped at 8.
#[must_use]
pub fn default_threads() -> usize {
    num_cpus::get().min(8)
}

fn build_pool(num_threads: usize) -> anyhow::Result<rayon::ThreadPool> {
    Ok(ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .thread_name(|i| format!("archdiff-hash-{i}"))
        .build()?)
}

/// Initialize the hashing pool with the specified number of threads
///
/// # Errors
///
/// Returns an error if the pool cannot be built or was already initialized
pub fn init_thread_pool(num_threads: usize) -> anyhow::Result<()> {
    let pool = build_pool(num_threads)?;

    THREAD_POOL
        .set(Arc::new(pool))
        .map_err(|_| anyhow::anyhow!("Thread pool already initialized"))?;

    Ok(())
}

/// Get the hashing pool, initializing with default settings if needed
///
/// # Errors
///
/// Returns an error if the pool cannot be created
pub fn get_thread_pool() -> anyhow::Result<Arc<rayon::ThreadPool>> {
    THREAD_POOL
        .get_or_try_init(|| build_pool(default_threads()).map(Arc::new))
        .cloned()
}

/// Run a function in the hashing pool
///
/// # Errors
///
/// Returns an error if the pool cannot be created
pub fn run_in_pool<F, R>(f: F) -> anyhow::Result<R>
where
    F: FnOnce() -> R + Send,
    R: Send,
{
    let pool = get_thread_pool()?;
    Ok(pool.install(f))
}

/// Configure the pool from config. Calling it twice keeps the first pool.
///
/// # Errors
///
/// Returns an error if the pool cannot be built
pub fn configure_from_config(config: &crate::config::Config) -> anyhow::Result<()> {
    let threads = config.performance.parallel_threads;
    if threads > 0 && THREAD_POOL.get().is_none() {
        init_thread_pool(threads)?;
    }
    Ok(())
}

mod num_cpus {
    use std::sync::LazyLock;

    static NUM_CPUS: LazyLock<usize> = LazyLock::new(|| {
        std::thread::available_parallelism()
            .map(std::num::NonZeroUsize::get)
            .unwrap_or(1)
    });

    pub fn get() -> usize {
        *NUM_CPUS
    }
}
