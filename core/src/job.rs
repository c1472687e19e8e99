//! A minimal worker-pool helper for octree build-time preprocessing
//! (§5, §9 "Global engine state" / concurrency model). The render loop
//! itself is single-threaded and synchronous; this is the only place the
//! engine may fan work out across threads, and only at `prepare_for_rendering`
//! time, never mid-frame.
//!
//! Each worker is handed a disjoint sub-range of entity indices and writes
//! into its own `Vec`, which the caller merges after `scope` returns — a
//! barrier, matching the spec's "thread-local buffer merged at barrier".

/// Splits `0..len` into up to `worker_count` contiguous, disjoint ranges
/// and runs `work` for each on its own thread inside a scope, merging the
/// returned per-worker `Vec<T>`s in range order once every worker is done.
pub fn parallel_build<T, F>(len: usize, worker_count: usize, work: F) -> Vec<T>
where
    T: Send,
    F: Fn(std::ops::Range<usize>) -> Vec<T> + Sync,
{
    if len == 0 {
        return Vec::new();
    }
    let worker_count = worker_count.max(1).min(len);
    let chunk = len.div_ceil(worker_count);
    let ranges: Vec<std::ops::Range<usize>> = (0..worker_count)
        .map(|i| (i * chunk).min(len)..((i + 1) * chunk).min(len))
        .filter(|r| !r.is_empty())
        .collect();

    if ranges.len() <= 1 {
        return work(0..len);
    }

    let work = &work;
    crossbeam_utils::thread::scope(|scope| {
        let handles: Vec<_> = ranges
            .iter()
            .cloned()
            .map(|range| scope.spawn(move |_| work(range)))
            .collect();
        handles
            .into_iter()
            .flat_map(|h| h.join().expect("octree build worker panicked"))
            .collect()
    })
    .expect("octree build worker pool failed")
}

/// Default worker count for build-time preprocessing: one per logical CPU,
/// matching the teacher's `num_cpus::get()` use for thread-pool sizing.
pub fn default_worker_count() -> usize {
    num_cpus::get()
}
