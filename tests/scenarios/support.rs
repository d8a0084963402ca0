//! Fixtures shared by the scenario tests: a `NoopDialog`/`NoopTimer` pair
//! (mirroring `hevy_sync::context`'s own test module) plus a full
//! `SyncContext` builder over the in-memory doubles and a scripted
//! transport.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hevy_sync::prelude::*;
use hevy_sync::SyncContext;
use hevy_sync_core::durable::in_memory::InMemoryDurableStore;
use hevy_sync_core::interfaces::in_memory::{InMemoryPropertyStore, InMemoryTabularStore};
use hevy_sync_core::{ScheduledTimerId, TimerHandlerId};
use hevy_sync_transport::fake::ScriptedTransport;
use hevy_sync_transport::{TransportError, TransportRequest, TransportResponse};

pub struct NoopDialog {
    pub resume_choice: ResumeChoice,
}

impl NoopDialog {
    pub fn resuming() -> Self {
        Self { resume_choice: ResumeChoice::Resume }
    }
}

#[async_trait]
impl Dialog for NoopDialog {
    async fn prompt_resume_choice(&self) -> ResumeChoice {
        self.resume_choice
    }
    async fn show_initial_setup(&self) {}
    async fn show_reenter_key(&self) {}
    async fn notify(&self, _message: &str, _level: NoticeLevel) {}
}

pub struct NoopTimer;

impl Timer for NoopTimer {
    fn schedule(&self, _at: chrono::DateTime<chrono::Utc>, _handler: TimerHandlerId) -> ScheduledTimerId {
        ScheduledTimerId(0)
    }
    fn cancel(&self, _id: ScheduledTimerId) {}
    fn pending(&self) -> Vec<ScheduledTimerId> {
        Vec::new()
    }
}

pub type TestContext<T> = SyncContext<
    T,
    InMemoryDurableStore<TestClock>,
    TestClock,
    InMemoryTabularStore,
    InMemoryPropertyStore,
    NoopDialog,
    NoopTimer,
    InMemoryImportLock,
>;

/// Builds a full `SyncContext` over the given transport and an in-memory
/// durable/tabular/property store stack, sharing one `TestClock` across
/// every time-aware component.
pub fn context<T: Transport>(
    transport: Arc<T>,
    clock: Arc<TestClock>,
    dialog: NoopDialog,
    config: SyncConfig,
) -> (TestContext<T>, Arc<InMemoryPropertyStore>, Arc<InMemoryTabularStore>) {
    let durable = Arc::new(InMemoryDurableStore::new(Arc::clone(&clock)));
    let properties = Arc::new(InMemoryPropertyStore::new());
    let sheets = Arc::new(InMemoryTabularStore::new());

    let ctx = SyncContext::new(
        transport,
        "https://api.example.com",
        "test-key",
        durable,
        Arc::clone(&sheets),
        Arc::clone(&properties),
        Arc::new(dialog),
        Arc::new(NoopTimer),
        Arc::new(InMemoryImportLock::new()),
        clock,
        config,
    );

    (ctx, properties, sheets)
}

/// A [`Transport`] decorator that advances a shared [`TestClock`] by a fixed
/// step on every call before delegating to the wrapped transport. Lets a
/// scenario simulate wall-clock time elapsing across requests without a
/// real sleep, so a deadline can be crossed deterministically between one
/// page fetch and the next.
pub struct ClockAdvancingTransport {
    inner: Arc<ScriptedTransport>,
    clock: Arc<TestClock>,
    step: Duration,
    calls: AtomicU64,
}

impl ClockAdvancingTransport {
    pub fn new(inner: Arc<ScriptedTransport>, clock: Arc<TestClock>, step: Duration) -> Self {
        Self { inner, clock, step, calls: AtomicU64::new(0) }
    }

    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for ClockAdvancingTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.clock.advance(self.step);
        self.inner.send(request).await
    }
}
