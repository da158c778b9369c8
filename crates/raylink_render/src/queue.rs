//! Deferred submission queue and the render thread that drains it.
//!
//! Caller threads push [`SubmissionUnit`]s through a [`Submitter`]; a
//! single [`RenderThread`] executes them in order against the
//! [`RenderContext`]. Units are fire-and-forget: a failing or panicking
//! unit is logged and counted, and the loop carries on.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, JoinHandle};

use raylink_core::errors::{ApiError, Result};

use crate::context::RenderContext;

pub type UnitFn = Box<dyn FnOnce(&mut RenderContext) -> Result<()> + Send>;
pub type InspectFn = Box<dyn FnOnce(&RenderContext) + Send>;

/// One piece of deferred work. Everything it needs is moved into it.
pub struct SubmissionUnit {
    label: &'static str,
    work: UnitFn,
}

impl SubmissionUnit {
    pub fn new(label: &'static str, work: impl FnOnce(&mut RenderContext) -> Result<()> + Send + 'static) -> Self {
        Self {
            label,
            work: Box::new(work),
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        self.label
    }
}

impl std::fmt::Debug for SubmissionUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionUnit").field("label", &self.label).finish_non_exhaustive()
    }
}

/// Render thread control messages. Only `Execute` counts as work.
pub enum Message {
    Execute(SubmissionUnit),
    /// Fence: answered once every earlier message has been processed.
    Sync(flume::Sender<()>),
    Inspect(InspectFn),
    Shutdown,
}

// ============================================================================
// Statistics
// ============================================================================

#[derive(Debug, Default)]
pub struct QueueStats {
    submitted: AtomicU64,
    executed: AtomicU64,
    failed: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueueStatsSnapshot {
    pub submitted: u64,
    pub executed: u64,
    pub failed: u64,
}

impl QueueStats {
    #[must_use]
    pub fn snapshot(&self) -> QueueStatsSnapshot {
        QueueStatsSnapshot {
            submitted: self.submitted.load(Ordering::Acquire),
            executed: self.executed.load(Ordering::Acquire),
            failed: self.failed.load(Ordering::Acquire),
        }
    }
}

// ============================================================================
// Submitter
// ============================================================================

/// Producer side of the queue. Cheap to clone.
#[derive(Clone)]
pub struct Submitter {
    sender: flume::Sender<Message>,
    stats: Arc<QueueStats>,
}

impl std::fmt::Debug for Submitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Submitter")
            .field("queued", &self.sender.len())
            .field("stats", &self.stats.snapshot())
            .finish()
    }
}

impl Submitter {
    pub fn submit(&self, unit: SubmissionUnit) -> Result<()> {
        self.stats.submitted.fetch_add(1, Ordering::AcqRel);
        if self.sender.send(Message::Execute(unit)).is_err() {
            self.stats.submitted.fetch_sub(1, Ordering::AcqRel);
            return Err(ApiError::NotInitialized);
        }
        Ok(())
    }

    /// Shorthand for building and submitting a unit.
    pub fn emit(
        &self,
        label: &'static str,
        work: impl FnOnce(&mut RenderContext) -> Result<()> + Send + 'static,
    ) -> Result<()> {
        self.submit(SubmissionUnit::new(label, work))
    }

    /// Blocks until every message sent before this call has been processed.
    pub fn sync(&self) -> Result<()> {
        let (tx, rx) = flume::bounded(1);
        self.sender.send(Message::Sync(tx)).map_err(|_| ApiError::NotInitialized)?;
        rx.recv().map_err(|_| ApiError::NotInitialized)
    }

    /// Runs `f` on the render thread after all earlier work and returns its result.
    pub fn inspect<R, F>(&self, f: F) -> Result<R>
    where
        R: Send + 'static,
        F: FnOnce(&RenderContext) -> R + Send + 'static,
    {
        let (tx, rx) = flume::bounded(1);
        let probe: InspectFn = Box::new(move |ctx| {
            let _ = tx.send(f(ctx));
        });
        self.sender
            .send(Message::Inspect(probe))
            .map_err(|_| ApiError::NotInitialized)?;
        rx.recv()
            .map_err(|_| ApiError::Backend("render thread dropped an inspection".to_string()))
    }

    #[must_use]
    pub fn stats(&self) -> QueueStatsSnapshot {
        self.stats.snapshot()
    }
}

// ============================================================================
// RenderThread
// ============================================================================

pub struct RenderThread {
    submitter: Submitter,
    handle: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for RenderThread {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderThread")
            .field("running", &self.is_running())
            .field("submitter", &self.submitter)
            .finish()
    }
}

impl RenderThread {
    /// Spawns the consumer thread, moving `context` onto it.
    pub fn spawn(name: &str, context: RenderContext) -> Result<Self> {
        let (sender, receiver) = flume::unbounded::<Message>();
        let stats = Arc::new(QueueStats::default());
        let thread_stats = Arc::clone(&stats);

        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || Self::render_thread_main(&receiver, context, &thread_stats))?;

        log::debug!("render thread '{name}' started");
        Ok(Self {
            submitter: Submitter { sender, stats },
            handle: Some(handle),
        })
    }

    #[must_use]
    pub fn submitter(&self) -> &Submitter {
        &self.submitter
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Drains the remaining work and joins the thread. Safe to call twice.
    pub fn shutdown(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        let _ = self.submitter.sender.send(Message::Shutdown);
        if handle.join().is_err() {
            log::error!("render thread terminated abnormally");
        }
        let stats = self.submitter.stats();
        log::debug!(
            "render thread stopped: {} executed, {} failed",
            stats.executed,
            stats.failed
        );
    }

    fn render_thread_main(receiver: &flume::Receiver<Message>, mut context: RenderContext, stats: &QueueStats) {
        for message in receiver.iter() {
            match message {
                Message::Execute(unit) => {
                    if !Self::execute(unit, &mut context) {
                        stats.failed.fetch_add(1, Ordering::AcqRel);
                    }
                    stats.executed.fetch_add(1, Ordering::AcqRel);
                }
                Message::Sync(reply) => {
                    let _ = reply.send(());
                }
                Message::Inspect(probe) => {
                    let ctx = &context;
                    if catch_unwind(AssertUnwindSafe(|| probe(ctx))).is_err() {
                        log::error!("inspection panicked on the render thread");
                    }
                }
                Message::Shutdown => break,
            }
        }
        if let Err(err) = context.flush() {
            log::error!("final flush failed: {err}");
        }
    }

    /// Runs one unit and flushes what it recorded. Returns `false` on failure.
    fn execute(unit: SubmissionUnit, context: &mut RenderContext) -> bool {
        let SubmissionUnit { label, work } = unit;
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            work(&mut *context)?;
            context.flush()
        }));
        match outcome {
            Ok(Ok(())) => true,
            Ok(Err(err)) => {
                log::error!("submission '{label}' failed: {err}");
                // Drop anything the failed unit left behind.
                context.commands.take();
                false
            }
            Err(_) => {
                log::error!("submission '{label}' panicked");
                context.commands.take();
                false
            }
        }
    }
}

impl Drop for RenderThread {
    fn drop(&mut self) {
        self.shutdown();
    }
}
