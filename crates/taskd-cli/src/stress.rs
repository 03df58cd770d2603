//! Concurrency load harness for the task store.
//!
//! Both modes drive one shared [`TaskStore`] from plain OS threads and run
//! under a watchdog: if the workers have not all finished within the
//! timeout the run is reported as a probable deadlock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail};
use rand::seq::SliceRandom;
use rand::Rng;

use taskd_store::{PageRequest, TaskStore, DEFAULT_PAGE_LIMIT};
use taskd_types::{TaskDraft, TaskId, TaskStatus};

/// Min/max/mean latency over a set of operations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Latency {
    count: u64,
    total: Duration,
    min: Option<Duration>,
    max: Duration,
}

impl Latency {
    fn record(&mut self, elapsed: Duration) {
        self.count += 1;
        self.total += elapsed;
        self.min = Some(self.min.map_or(elapsed, |m| m.min(elapsed)));
        self.max = self.max.max(elapsed);
    }

    fn merge(&mut self, other: &Latency) {
        self.count += other.count;
        self.total += other.total;
        self.min = match (self.min, other.min) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.max = self.max.max(other.max);
    }

    pub fn min(&self) -> Duration {
        self.min.unwrap_or_default()
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    pub fn mean(&self) -> Duration {
        if self.count == 0 {
            return Duration::ZERO;
        }
        let nanos = self.total.as_nanos() / u128::from(self.count);
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }
}

/// Per-thread outcome, merged into a [`StressReport`] at the end.
#[derive(Debug, Default)]
struct Tally {
    succeeded: u64,
    failed: u64,
    latency: Latency,
}

impl Tally {
    fn record(&mut self, ok: bool, elapsed: Duration) {
        if ok {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        self.latency.record(elapsed);
    }
}

/// Result of one harness run.
#[derive(Clone, Debug)]
pub struct StressReport {
    pub succeeded: u64,
    pub failed: u64,
    pub elapsed: Duration,
    pub latency: Latency,
}

impl StressReport {
    fn from_tallies(tallies: impl IntoIterator<Item = Tally>, elapsed: Duration) -> Self {
        let mut report = Self {
            succeeded: 0,
            failed: 0,
            elapsed,
            latency: Latency::default(),
        };
        for tally in tallies {
            report.succeeded += tally.succeeded;
            report.failed += tally.failed;
            report.latency.merge(&tally.latency);
        }
        report
    }

    pub fn total(&self) -> u64 {
        self.succeeded + self.failed
    }

    /// Operations per second over the wall-clock time of the run.
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.total() as f64 / secs
    }

    /// Percentage of operations that succeeded.
    pub fn success_rate(&self) -> f64 {
        if self.total() == 0 {
            return 100.0;
        }
        self.succeeded as f64 * 100.0 / self.total() as f64
    }
}

/// Parameters for [`run_storage`].
#[derive(Clone, Debug)]
pub struct StorageLoad {
    pub ops: usize,
    pub workers: usize,
    pub seed_tasks: usize,
    pub timeout: Duration,
}

impl Default for StorageLoad {
    fn default() -> Self {
        Self {
            ops: 10_000,
            workers: 50,
            seed_tasks: 1_000,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Parameters for [`run_mixed`].
#[derive(Clone, Debug)]
pub struct MixedLoad {
    pub readers: usize,
    pub writers: usize,
    pub listers: usize,
    pub reader_ops: usize,
    pub writer_ops: usize,
    pub lister_ops: usize,
    pub reader_pause: Duration,
    pub writer_pause: Duration,
    pub lister_pause: Duration,
    pub seed_tasks: usize,
    pub progress_every: Duration,
    pub timeout: Duration,
}

impl Default for MixedLoad {
    fn default() -> Self {
        Self {
            readers: 70,
            writers: 20,
            listers: 10,
            reader_ops: 100,
            writer_ops: 50,
            lister_ops: 20,
            reader_pause: Duration::from_millis(1),
            writer_pause: Duration::from_millis(2),
            lister_pause: Duration::from_millis(5),
            seed_tasks: 500,
            progress_every: Duration::from_secs(5),
            timeout: Duration::from_secs(45),
        }
    }
}

fn seed(store: &dyn TaskStore, count: usize) -> anyhow::Result<Vec<TaskId>> {
    (0..count)
        .map(|i| {
            store
                .create(TaskDraft::new(format!("seed-{i}"), TaskStatus::Pending))
                .map(|task| task.id)
                .map_err(|e| anyhow!("seeding failed: {e}"))
        })
        .collect()
}

fn seeded_pages(seeded: usize) -> i64 {
    i64::try_from(seeded.div_ceil(DEFAULT_PAGE_LIMIT).max(1)).unwrap_or(i64::MAX)
}

/// Run `work` on a helper thread and wait at most `timeout` for it.
fn with_watchdog<T, F>(timeout: Duration, work: F) -> anyhow::Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(work());
    });
    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => {
            bail!("workers did not finish within {timeout:?}; possible deadlock")
        }
        Err(RecvTimeoutError::Disconnected) => bail!("stress coordinator panicked"),
    }
}

fn join_all(handles: Vec<thread::JoinHandle<Tally>>) -> anyhow::Result<Vec<Tally>> {
    handles
        .into_iter()
        .map(|h| h.join().map_err(|_| anyhow!("worker thread panicked")))
        .collect()
}

/// Seed the store, then run `ops` random operations (60% get, 20% create,
/// 20% list) spread across `workers` threads.
pub fn run_storage(store: Arc<dyn TaskStore>, load: &StorageLoad) -> anyhow::Result<StressReport> {
    if load.workers == 0 {
        bail!("at least one worker is required");
    }
    let ids = Arc::new(seed(store.as_ref(), load.seed_tasks)?);
    tracing::debug!(seeded = ids.len(), "seeded store for storage stress");

    let workers = load.workers;
    let ops = load.ops;
    with_watchdog(load.timeout, move || {
        let started = Instant::now();
        let handles = (0..workers)
            .map(|worker| {
                let store = Arc::clone(&store);
                let ids = Arc::clone(&ids);
                // The first `ops % workers` workers take one extra operation.
                let share = ops / workers + usize::from(worker < ops % workers);
                thread::spawn(move || storage_worker(store.as_ref(), &ids, share, worker))
            })
            .collect();
        let tallies = join_all(handles)?;
        Ok(StressReport::from_tallies(tallies, started.elapsed()))
    })
}

fn storage_worker(store: &dyn TaskStore, ids: &[TaskId], ops: usize, worker: usize) -> Tally {
    let mut rng = rand::thread_rng();
    let pages = seeded_pages(ids.len());
    let mut tally = Tally::default();
    for i in 0..ops {
        let roll = rng.gen_range(0..100);
        let started = Instant::now();
        let ok = if roll < 60 {
            match ids.choose(&mut rng) {
                Some(id) => store.get(id).is_ok(),
                None => store.list(PageRequest::default()).is_ok(),
            }
        } else if roll < 80 {
            let draft = TaskDraft::new(format!("stress-{worker}-{i}"), TaskStatus::Pending);
            store.create(draft).is_ok()
        } else {
            let page = rng.gen_range(1..=pages);
            store.list(PageRequest::new(page)).is_ok()
        };
        tally.record(ok, started.elapsed());
    }
    tally
}

/// Run reader, writer and lister threads side by side. `progress` receives
/// the number of completed operations every `progress_every`.
pub fn run_mixed<P>(
    store: Arc<dyn TaskStore>,
    load: &MixedLoad,
    progress: P,
) -> anyhow::Result<StressReport>
where
    P: Fn(u64) + Send + 'static,
{
    let ids = Arc::new(seed(store.as_ref(), load.seed_tasks)?);
    let completed = Arc::new(AtomicU64::new(0));
    let load = load.clone();

    let (stop_tx, stop_rx) = mpsc::channel::<()>();
    let every = load.progress_every;
    let ticker_count = Arc::clone(&completed);
    let ticker = thread::spawn(move || loop {
        match stop_rx.recv_timeout(every) {
            Err(RecvTimeoutError::Timeout) => progress(ticker_count.load(Ordering::Relaxed)),
            _ => break,
        }
    });

    let result = with_watchdog(load.timeout, move || {
        let started = Instant::now();
        let mut handles = Vec::with_capacity(load.readers + load.writers + load.listers);

        for _ in 0..load.readers {
            let (store, ids) = (Arc::clone(&store), Arc::clone(&ids));
            let completed = Arc::clone(&completed);
            let (ops, pause) = (load.reader_ops, load.reader_pause);
            handles.push(thread::spawn(move || {
                reader(store.as_ref(), &ids, ops, pause, &completed)
            }));
        }
        for worker in 0..load.writers {
            let (store, completed) = (Arc::clone(&store), Arc::clone(&completed));
            let (ops, pause) = (load.writer_ops, load.writer_pause);
            handles.push(thread::spawn(move || {
                writer(store.as_ref(), worker, ops, pause, &completed)
            }));
        }
        for _ in 0..load.listers {
            let (store, completed) = (Arc::clone(&store), Arc::clone(&completed));
            let pages = seeded_pages(ids.len());
            let (ops, pause) = (load.lister_ops, load.lister_pause);
            handles.push(thread::spawn(move || {
                lister(store.as_ref(), pages, ops, pause, &completed)
            }));
        }

        let tallies = join_all(handles)?;
        Ok(StressReport::from_tallies(tallies, started.elapsed()))
    });

    let _ = stop_tx.send(());
    let _ = ticker.join();
    result
}

fn reader(
    store: &dyn TaskStore,
    ids: &[TaskId],
    ops: usize,
    pause: Duration,
    completed: &AtomicU64,
) -> Tally {
    let mut rng = rand::thread_rng();
    let mut tally = Tally::default();
    for _ in 0..ops {
        let started = Instant::now();
        let ok = match ids.choose(&mut rng) {
            Some(id) => store.get(id).is_ok(),
            None => store.list(PageRequest::default()).is_ok(),
        };
        tally.record(ok, started.elapsed());
        completed.fetch_add(1, Ordering::Relaxed);
        thread::sleep(pause);
    }
    tally
}

/// Writers create tasks, mark some of them done and delete others, touching
/// only tasks they created themselves.
fn writer(
    store: &dyn TaskStore,
    worker: usize,
    ops: usize,
    pause: Duration,
    completed: &AtomicU64,
) -> Tally {
    let mut tally = Tally::default();
    let mut own: Vec<TaskId> = Vec::new();
    for i in 0..ops {
        let started = Instant::now();
        let ok = match (i % 5, own.last().copied()) {
            (3, Some(id)) => store
                .update(&id, TaskDraft::new(format!("writer-{worker}-{i}"), TaskStatus::Done))
                .is_ok(),
            (4, Some(_)) => match own.pop() {
                Some(id) => store.delete(&id).is_ok(),
                None => true,
            },
            _ => {
                let draft = TaskDraft::new(format!("writer-{worker}-{i}"), TaskStatus::Pending);
                match store.create(draft) {
                    Ok(task) => {
                        own.push(task.id);
                        true
                    }
                    Err(_) => false,
                }
            }
        };
        tally.record(ok, started.elapsed());
        completed.fetch_add(1, Ordering::Relaxed);
        thread::sleep(pause);
    }
    tally
}

fn lister(
    store: &dyn TaskStore,
    pages: i64,
    ops: usize,
    pause: Duration,
    completed: &AtomicU64,
) -> Tally {
    let mut rng = rand::thread_rng();
    let mut tally = Tally::default();
    for _ in 0..ops {
        let started = Instant::now();
        let ok = store.list(PageRequest::new(rng.gen_range(1..=pages))).is_ok();
        tally.record(ok, started.elapsed());
        completed.fetch_add(1, Ordering::Relaxed);
        thread::sleep(pause);
    }
    tally
}
