//! Shared infrastructure for the hevy-sync workspace: the [`Clock`]
//! abstraction, the [`DurableStore`] trait behind the two-tier cache and the
//! rate-limit tracker, the crate-wide [`SyncConfig`] tunables, and the event
//! system used for observability.

pub mod clock;
pub mod config;
pub mod durable;
pub mod events;
pub mod interfaces;

pub use clock::{Clock, SystemClock, TestClock};
pub use config::{SyncConfig, SyncConfigBuilder};
pub use durable::DurableStore;
pub use events::{EventListener, EventListeners, FnListener, ResilienceEvent};
pub use interfaces::{
    CellValue, Dialog, NoticeLevel, PropertyStore, RangeRef, ResumeChoice, ScheduledTimerId,
    SheetError, TabularStore, Timer, TimerHandlerId,
};
