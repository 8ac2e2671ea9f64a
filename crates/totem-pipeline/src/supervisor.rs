//! Render supervision
//!
//! The supervisor owns at most one render worker. Starting a new renderer
//! first cancels the running one and joins its thread, so two renderers never
//! paint into the sink at the same time.
//!
//! ```text
//! submit(r2):  cancel(t1) → join(t1) → r2.tick() on caller → spawn(t2)
//! ```

use crate::renderer::{RenderError, Renderer, Tick};
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use thiserror::Error;
use totem_core::FrameSink;
use tracing::{debug, error, info};

/// The frame sink shared between the supervisor and its worker
pub type SharedSink = Arc<Mutex<Box<dyn FrameSink>>>;

/// Wrap a sink for use by a supervisor
pub fn shared_sink(sink: impl FrameSink + 'static) -> SharedSink {
    let sink: Box<dyn FrameSink> = Box::new(sink);
    Arc::new(Mutex::new(sink))
}

/// Supervisor errors
#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("Failed to spawn render worker: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Renderer failed: {0}")]
    Render(#[from] RenderError),
}

/// Cooperative cancellation flag with an interruptible wait
#[derive(Clone, Default)]
pub struct StopToken {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation and wake any waiter
    pub fn cancel(&self) {
        let (flag, condvar) = &*self.inner;
        *flag.lock() = true;
        condvar.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        *self.inner.0.lock()
    }

    /// Wait up to `timeout`, returning early on cancellation
    ///
    /// Returns `true` when cancelled.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let (flag, condvar) = &*self.inner;
        let deadline = Instant::now() + timeout;
        let mut cancelled = flag.lock();
        while !*cancelled {
            if condvar.wait_until(&mut cancelled, deadline).timed_out() {
                break;
            }
        }
        *cancelled
    }
}

struct RenderTask {
    name: &'static str,
    token: StopToken,
    handle: JoinHandle<()>,
}

/// Owns the single active render worker
pub struct RenderSupervisor {
    sink: SharedSink,
    active: Option<RenderTask>,
}

impl RenderSupervisor {
    pub fn new(sink: SharedSink) -> Self {
        Self { sink, active: None }
    }

    /// The sink renderers paint into
    pub fn sink(&self) -> &SharedSink {
        &self.sink
    }

    /// Stop the current renderer and start `renderer`
    ///
    /// The first tick runs on the calling thread. A renderer that finishes on
    /// its first tick never gets a worker thread.
    pub fn submit(&mut self, mut renderer: Box<dyn Renderer>) -> Result<(), SupervisorError> {
        self.stop();

        let name = renderer.name();
        let first = {
            let mut sink = self.sink.lock();
            renderer.tick(sink.as_mut())?
        };

        let wait = match first {
            Tick::Finished => {
                debug!(renderer = name, "Renderer finished on first tick");
                return Ok(());
            }
            Tick::Continue(wait) => wait,
        };

        let token = StopToken::new();
        let worker_token = token.clone();
        let sink = Arc::clone(&self.sink);
        let handle = thread::Builder::new()
            .name(format!("render-{name}"))
            .spawn(move || run_worker(renderer, sink, worker_token, wait))?;

        info!(renderer = name, "Started render worker");
        self.active = Some(RenderTask {
            name,
            token,
            handle,
        });
        Ok(())
    }

    /// Cancel and join the current worker, if any
    pub fn stop(&mut self) {
        let Some(task) = self.active.take() else {
            return;
        };

        task.token.cancel();
        if task.handle.join().is_err() {
            error!(renderer = task.name, "Render worker panicked");
        }
        info!(renderer = task.name, "Stopped render worker");
    }

    /// Whether a worker is alive
    pub fn is_running(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|task| !task.handle.is_finished())
    }

    /// Name of the live worker's renderer
    pub fn active_task(&self) -> Option<&'static str> {
        self.active
            .as_ref()
            .filter(|task| !task.handle.is_finished())
            .map(|task| task.name)
    }
}

impl Drop for RenderSupervisor {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_worker(
    mut renderer: Box<dyn Renderer>,
    sink: SharedSink,
    token: StopToken,
    first_wait: Duration,
) {
    let name = renderer.name();
    let mut wait = first_wait;

    loop {
        if token.wait_timeout(wait) {
            debug!(renderer = name, "Render worker cancelled");
            break;
        }

        let result = {
            let mut sink = sink.lock();
            renderer.tick(sink.as_mut())
        };

        match result {
            Ok(Tick::Continue(next)) => wait = next,
            Ok(Tick::Finished) => {
                debug!(renderer = name, "Renderer finished");
                break;
            }
            Err(e) => {
                error!(renderer = name, error = %e, "Renderer failed");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use totem_core::{MemorySink, SinkError};

    /// Tracks how many renderers have started ticking and not yet been dropped
    #[derive(Default)]
    struct Gauge {
        live: AtomicUsize,
        max: AtomicUsize,
        ticks: AtomicUsize,
    }

    struct CountingRenderer {
        gauge: Arc<Gauge>,
        started: bool,
        finish_after: Option<usize>,
        ticks: usize,
    }

    impl CountingRenderer {
        fn new(gauge: &Arc<Gauge>) -> Self {
            Self {
                gauge: Arc::clone(gauge),
                started: false,
                finish_after: None,
                ticks: 0,
            }
        }
    }

    impl Renderer for CountingRenderer {
        fn tick(&mut self, sink: &mut dyn FrameSink) -> Result<Tick, RenderError> {
            if !self.started {
                self.started = true;
                let live = self.gauge.live.fetch_add(1, Ordering::SeqCst) + 1;
                self.gauge.max.fetch_max(live, Ordering::SeqCst);
            }
            self.ticks += 1;
            self.gauge.ticks.fetch_add(1, Ordering::SeqCst);
            sink.clear();
            sink.swap_on_vsync(1)?;

            match self.finish_after {
                Some(n) if self.ticks >= n => Ok(Tick::Finished),
                _ => Ok(Tick::Continue(Duration::from_millis(1))),
            }
        }

        fn name(&self) -> &'static str {
            "counting"
        }
    }

    impl Drop for CountingRenderer {
        fn drop(&mut self) {
            if self.started {
                self.gauge.live.fetch_sub(1, Ordering::SeqCst);
            }
        }
    }

    struct FailingRenderer;

    impl Renderer for FailingRenderer {
        fn tick(&mut self, _sink: &mut dyn FrameSink) -> Result<Tick, RenderError> {
            Err(RenderError::Sink(SinkError::Disconnected))
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    #[test]
    fn test_stop_token() {
        let token = StopToken::new();
        assert!(!token.is_cancelled());
        assert!(!token.wait_timeout(Duration::from_millis(1)));

        let waiter = token.clone();
        let handle = thread::spawn(move || waiter.wait_timeout(Duration::from_secs(30)));
        token.cancel();
        assert!(handle.join().unwrap());
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_at_most_one_worker() {
        let gauge = Arc::new(Gauge::default());
        let mut supervisor = RenderSupervisor::new(shared_sink(MemorySink::new(8, 8)));

        for _ in 0..20 {
            supervisor
                .submit(Box::new(CountingRenderer::new(&gauge)))
                .unwrap();
            assert!(gauge.live.load(Ordering::SeqCst) <= 1);
            thread::sleep(Duration::from_millis(2));
        }

        assert!(supervisor.is_running());
        assert_eq!(supervisor.active_task(), Some("counting"));

        supervisor.stop();
        assert!(!supervisor.is_running());
        assert_eq!(gauge.live.load(Ordering::SeqCst), 0);
        assert_eq!(gauge.max.load(Ordering::SeqCst), 1);
        assert!(gauge.ticks.load(Ordering::SeqCst) >= 20);
    }

    #[test]
    fn test_finished_on_first_tick_spawns_nothing() {
        let gauge = Arc::new(Gauge::default());
        let mut supervisor = RenderSupervisor::new(shared_sink(MemorySink::new(8, 8)));

        let mut renderer = CountingRenderer::new(&gauge);
        renderer.finish_after = Some(1);
        supervisor.submit(Box::new(renderer)).unwrap();

        assert!(!supervisor.is_running());
        assert_eq!(supervisor.active_task(), None);
        assert_eq!(gauge.ticks.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_worker_exits_when_renderer_finishes() {
        let gauge = Arc::new(Gauge::default());
        let mut supervisor = RenderSupervisor::new(shared_sink(MemorySink::new(8, 8)));

        let mut renderer = CountingRenderer::new(&gauge);
        renderer.finish_after = Some(3);
        supervisor.submit(Box::new(renderer)).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while supervisor.is_running() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        assert!(!supervisor.is_running());
        assert_eq!(gauge.ticks.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_first_tick_error_is_reported() {
        let mut supervisor = RenderSupervisor::new(shared_sink(MemorySink::new(8, 8)));
        let result = supervisor.submit(Box::new(FailingRenderer));

        assert!(matches!(result, Err(SupervisorError::Render(_))));
        assert!(!supervisor.is_running());
    }
}
