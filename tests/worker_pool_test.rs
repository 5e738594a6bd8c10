//! Integration tests for WorkerPool
//!
//! These tests validate the pool's coordination contract:
//! - Exact-N concurrency bound with blocked submitters
//! - Acceptance-only backpressure (run unblocks on hand-off, not completion)
//! - Shutdown draining every accepted unit
//! - Closed-pool submission failing fast

use foreman::core::{PoolError, Worker, WorkerPool};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

// ============================================================================
// HELPER TYPES
// ============================================================================

/// Tracks concurrent executions to verify the concurrency bound.
#[derive(Clone, Default)]
struct ConcurrencyProbe {
    concurrent: Arc<AtomicU64>,
    max_concurrent: Arc<AtomicU64>,
    completed: Arc<AtomicU64>,
}

impl ConcurrencyProbe {
    fn unit(&self, duration: Duration) -> impl FnOnce() + Send + 'static {
        let probe = self.clone();
        move || {
            let current = probe.concurrent.fetch_add(1, Ordering::SeqCst) + 1;

            // Update max concurrent seen
            let mut max = probe.max_concurrent.load(Ordering::SeqCst);
            while current > max {
                match probe.max_concurrent.compare_exchange_weak(
                    max,
                    current,
                    Ordering::SeqCst,
                    Ordering::SeqCst,
                ) {
                    Ok(_) => break,
                    Err(m) => max = m,
                }
            }

            thread::sleep(duration);

            probe.concurrent.fetch_sub(1, Ordering::SeqCst);
            probe.completed.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn max_concurrent(&self) -> u64 {
        self.max_concurrent.load(Ordering::SeqCst)
    }

    fn completed(&self) -> u64 {
        self.completed.load(Ordering::SeqCst)
    }
}

/// Struct-based unit of work, mirroring callers that implement `Worker`
/// directly instead of passing a closure.
struct NamePrinter {
    name: &'static str,
    printed: Arc<AtomicU64>,
}

impl Worker for NamePrinter {
    fn task(self: Box<Self>) {
        use rand::Rng;
        let jitter = rand::rng().random_range(1..20);
        thread::sleep(Duration::from_millis(jitter));
        println!("processed '{}'", self.name);
        self.printed.fetch_add(1, Ordering::SeqCst);
    }
}

// ============================================================================
// TESTS
// ============================================================================

/// More units than workers: exactly N run at once, the rest block in run().
#[test]
fn test_exact_concurrency_bound() {
    println!("\n=== test_exact_concurrency_bound ===");

    let pool = Arc::new(WorkerPool::new(2).expect("Failed to create pool"));
    let probe = ConcurrencyProbe::default();

    // Six submitters racing for two workers.
    let mut submitters = Vec::new();
    for _ in 0..6 {
        let pool = Arc::clone(&pool);
        let unit = probe.unit(Duration::from_millis(100));
        submitters.push(thread::spawn(move || {
            pool.run(unit).expect("Failed to submit");
        }));
    }

    for handle in submitters {
        handle.join().expect("Submitter panicked");
    }
    pool.shutdown();

    println!("Max concurrent observed: {}", probe.max_concurrent());
    assert_eq!(
        probe.max_concurrent(),
        2,
        "Expected the concurrency bound to be reached and never exceeded"
    );
    assert_eq!(probe.completed(), 6);

    println!("=== test_exact_concurrency_bound PASSED ===\n");
}

/// The spec scenario: capacity=4, 20 units sleeping 100ms each. Acceptance
/// of the whole batch is bound by worker availability (~400ms), and the
/// drain-inclusive total is ~500ms, independent of any completion signaling.
#[test]
fn test_acceptance_backpressure_timing() {
    println!("\n=== test_acceptance_backpressure_timing ===");

    let pool = WorkerPool::new(4).expect("Failed to create pool");
    let probe = ConcurrencyProbe::default();

    let start = Instant::now();
    for _ in 0..20 {
        pool.run(probe.unit(Duration::from_millis(100)))
            .expect("Failed to submit");
    }
    let accepted_in = start.elapsed();
    println!("All 20 units accepted in {accepted_in:?}");

    // Last hand-off waits for 16 units to finish across 4 workers.
    assert!(
        accepted_in >= Duration::from_millis(350),
        "Acceptance returned too early ({accepted_in:?}); run() must block on the hand-off"
    );

    pool.shutdown();
    let total = start.elapsed();
    println!("Drained in {total:?}");

    assert!(
        total >= Duration::from_millis(450),
        "Shutdown returned before the final batch could have finished ({total:?})"
    );
    assert_eq!(probe.completed(), 20);
    assert!(probe.max_concurrent() <= 4, "Concurrency bound exceeded");

    println!("=== test_acceptance_backpressure_timing PASSED ===\n");
}

/// Shutdown never returns before every accepted unit's task() has returned.
#[test]
fn test_shutdown_waits_for_accepted_work() {
    println!("\n=== test_shutdown_waits_for_accepted_work ===");

    let pool = WorkerPool::new(3).expect("Failed to create pool");
    let probe = ConcurrencyProbe::default();

    for _ in 0..9 {
        pool.run(probe.unit(Duration::from_millis(50)))
            .expect("Failed to submit");
    }

    pool.shutdown();

    assert_eq!(probe.completed(), 9, "Shutdown returned with work in flight");

    let stats = pool.stats();
    println!("Final stats: {stats:?}");
    assert_eq!(stats.accepted, 9);
    assert_eq!(stats.completed, 9);

    println!("=== test_shutdown_waits_for_accepted_work PASSED ===\n");
}

/// Submitting after shutdown fails fast with an explicit error.
#[test]
fn test_run_after_shutdown_fails() {
    println!("\n=== test_run_after_shutdown_fails ===");

    let pool = WorkerPool::new(1).expect("Failed to create pool");
    pool.shutdown();

    let result = pool.run(|| println!("should never run"));
    assert_eq!(result, Err(PoolError::Closed));

    // A second shutdown is a no-op, not a hang or a panic.
    pool.shutdown();

    println!("=== test_run_after_shutdown_fails PASSED ===\n");
}

/// Struct implementors of Worker work the same as closures; submitters that
/// need completion notification coordinate with an external counter.
#[test]
fn test_struct_worker_with_external_counter() {
    println!("\n=== test_struct_worker_with_external_counter ===");

    let names = ["steve", "bob", "mary", "therese", "jason"];
    let rounds = 20;

    let pool = Arc::new(WorkerPool::new(4).expect("Failed to create pool"));
    let printed = Arc::new(AtomicU64::new(0));

    let mut submitters = Vec::new();
    for _ in 0..rounds {
        for name in names {
            let pool = Arc::clone(&pool);
            let printed = Arc::clone(&printed);
            submitters.push(thread::spawn(move || {
                pool.run(NamePrinter { name, printed })
                    .expect("Failed to submit");
            }));
        }
    }

    for handle in submitters {
        handle.join().expect("Submitter panicked");
    }
    pool.shutdown();

    let expected = (names.len() * rounds) as u64;
    assert_eq!(printed.load(Ordering::SeqCst), expected);

    println!("=== test_struct_worker_with_external_counter PASSED ===\n");
}

/// Dropping a pool without shutdown detaches workers instead of hanging.
#[test]
fn test_drop_without_shutdown_does_not_hang() {
    println!("\n=== test_drop_without_shutdown_does_not_hang ===");

    let probe = ConcurrencyProbe::default();
    {
        let pool = WorkerPool::new(1).expect("Failed to create pool");
        pool.run(probe.unit(Duration::from_millis(200)))
            .expect("Failed to submit");
        // Dropped here with the unit still running.
    }

    // The detached worker finishes on its own.
    thread::sleep(Duration::from_millis(400));
    assert_eq!(probe.completed(), 1);

    println!("=== test_drop_without_shutdown_does_not_hang PASSED ===\n");
}
