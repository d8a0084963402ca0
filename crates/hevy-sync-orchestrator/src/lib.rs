//! Import Orchestrator: lock acquisition, API key resolution,
//! resume/restart/cancel prompting, step-sequence execution under a
//! wall-clock budget with per-step checkpointing, and a finalizer that runs
//! on every exit path.

mod config;
mod error;
mod events;
pub mod lock;
mod step;

pub use config::{OrchestratorConfig, API_KEY_PROPERTY};
pub use error::OrchestratorError;
pub use events::OrchestratorEvent;
pub use lock::{ImportLock, InMemoryImportLock};
pub use step::{ImportStep, StepError};

use hevy_sync_core::{Clock, Dialog, NoticeLevel, PropertyStore, ResumeChoice, Timer};
use hevy_sync_progress::{ImportProgressRecord, ProgressTracker};
use std::collections::HashSet;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Instant;

#[cfg(feature = "metrics")]
use metrics::histogram;

/// How a call to [`Orchestrator::run_full_import`] concluded. Only the
/// catch-all "any other error" case surfaces as an `Err` — everything else
/// is a normal, successful exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Paused,
    AlreadyInProgress,
    KeySetupRequired,
    ReauthRequired,
    CancelledByUser,
}

/// Composes the cross-execution lock, the API key property, the resume
/// dialog, the deferred timer, and the [`ProgressTracker`] into the single
/// `run_full_import` entry point.
pub struct Orchestrator<P, D, Tm, C, L, E>
where
    P: PropertyStore + 'static,
    D: Dialog,
    Tm: Timer,
    C: Clock + 'static,
    L: ImportLock,
    E: StepError,
{
    config: OrchestratorConfig,
    properties: Arc<P>,
    dialog: Arc<D>,
    timer: Arc<Tm>,
    clock: Arc<C>,
    lock: Arc<L>,
    progress: Arc<ProgressTracker<P, C>>,
    _step_error: PhantomData<E>,
}

impl<P, D, Tm, C, L, E> Orchestrator<P, D, Tm, C, L, E>
where
    P: PropertyStore + 'static,
    D: Dialog,
    Tm: Timer,
    C: Clock + 'static,
    L: ImportLock,
    E: StepError,
{
    pub fn new(
        config: OrchestratorConfig,
        properties: Arc<P>,
        dialog: Arc<D>,
        timer: Arc<Tm>,
        clock: Arc<C>,
        lock: Arc<L>,
        progress: Arc<ProgressTracker<P, C>>,
    ) -> Self {
        Self {
            config,
            properties,
            dialog,
            timer,
            clock,
            lock,
            progress,
            _step_error: PhantomData,
        }
    }

    /// Runs the full step sequence. `key_override` bypasses the stored API
    /// key (used when the caller just validated a fresh one);
    /// `skip_resume_dialog` forces an implicit RESTART instead of prompting
    /// when prior progress exists.
    pub async fn run_full_import(
        &self,
        steps: &[Arc<dyn ImportStep<E>>],
        key_override: Option<String>,
        skip_resume_dialog: bool,
    ) -> Result<RunOutcome, OrchestratorError<E>> {
        let acquired = self.lock.try_acquire(self.config.lock_wait).await;
        if !acquired {
            if self.progress.is_active().await {
                self.dialog
                    .notify("An import is already in progress.", NoticeLevel::Info)
                    .await;
                self.config.event_listeners.emit(&OrchestratorEvent::AlreadyInProgress {
                    pattern_name: self.config.name.clone(),
                    timestamp: Instant::now(),
                });
                return Ok(RunOutcome::AlreadyInProgress);
            }
            #[cfg(feature = "tracing")]
            tracing::warn!(
                orchestrator = %self.config.name,
                "lock unavailable but no fresh active marker; presumed crashed holder, proceeding"
            );
        }

        let result = self.run_inner(steps, key_override, skip_resume_dialog).await;

        // Finalizer: runs on every exit path.
        self.progress.clear_active().await;
        if acquired {
            self.lock.release().await;
        }

        result
    }

    async fn run_inner(
        &self,
        steps: &[Arc<dyn ImportStep<E>>],
        key_override: Option<String>,
        skip_resume_dialog: bool,
    ) -> Result<RunOutcome, OrchestratorError<E>> {
        let key = match key_override {
            Some(key) => Some(key),
            None => self.properties.get(API_KEY_PROPERTY).await,
        };
        if key.is_none() {
            self.dialog.show_initial_setup().await;
            return Ok(RunOutcome::KeySetupRequired);
        }

        let run_id = format!("run-{}", self.clock.now_utc().timestamp_millis());
        self.progress.mark_active(&run_id).await;
        for pending in self.timer.pending() {
            self.timer.cancel(pending);
        }

        let mut record = self.progress.load_progress().await;
        if !record.is_empty() {
            if skip_resume_dialog {
                record = ImportProgressRecord::default();
            } else {
                match self.dialog.prompt_resume_choice().await {
                    ResumeChoice::Resume => {}
                    ResumeChoice::Restart => record = ImportProgressRecord::default(),
                    ResumeChoice::Cancel => return Ok(RunOutcome::CancelledByUser),
                }
            }
        }

        let deadline = self.clock.now_instant() + self.config.max_execution_time;
        let heartbeat_task = self.spawn_heartbeat_task();

        let clock = Arc::clone(&self.clock);
        let is_expired = move || clock.now_instant() >= deadline;

        let mut completed: HashSet<String> = record.completed_steps.clone();
        let outcome = self.run_steps(steps, &mut completed, &is_expired).await;

        heartbeat_task.abort();

        if matches!(outcome, Ok(RunOutcome::Completed)) {
            self.progress.clear_progress().await;
            self.dialog.notify("Import complete.", NoticeLevel::Info).await;
            self.config.event_listeners.emit(&OrchestratorEvent::RunCompleted {
                pattern_name: self.config.name.clone(),
                timestamp: Instant::now(),
            });
        }

        outcome
    }

    async fn run_steps(
        &self,
        steps: &[Arc<dyn ImportStep<E>>],
        completed: &mut HashSet<String>,
        is_expired: &(dyn Fn() -> bool + Send + Sync),
    ) -> Result<RunOutcome, OrchestratorError<E>> {
        for step in steps {
            if completed.contains(step.name()) {
                continue;
            }

            if is_expired() {
                self.persist_pause(completed).await;
                return Ok(RunOutcome::Paused);
            }

            self.config.event_listeners.emit(&OrchestratorEvent::StepStarted {
                pattern_name: self.config.name.clone(),
                timestamp: Instant::now(),
                step: step.name(),
            });
            let started = Instant::now();

            match step.run(is_expired).await {
                Ok(()) => {
                    #[cfg(feature = "metrics")]
                    histogram!("orchestrator_step_duration_seconds", "step" => step.name())
                        .record(started.elapsed().as_secs_f64());
                    #[cfg(not(feature = "metrics"))]
                    let _ = started;

                    let mut latest = self.progress.load_progress().await;
                    latest.completed_steps.insert(step.name().to_string());
                    *completed = latest.completed_steps.clone();
                    self.progress.save_progress(&latest).await;

                    self.config.event_listeners.emit(&OrchestratorEvent::StepCompleted {
                        pattern_name: self.config.name.clone(),
                        timestamp: Instant::now(),
                        step: step.name(),
                    });
                }
                Err(err) if err.is_cancelled() => {
                    self.persist_pause(completed).await;
                    return Ok(RunOutcome::Paused);
                }
                Err(err) if err.is_unauthorized() => {
                    self.properties.delete(API_KEY_PROPERTY).await;
                    self.dialog.show_reenter_key().await;
                    self.config.event_listeners.emit(&OrchestratorEvent::ReauthRequired {
                        pattern_name: self.config.name.clone(),
                        timestamp: Instant::now(),
                        step: step.name(),
                    });
                    return Ok(RunOutcome::ReauthRequired);
                }
                Err(err) => return Err(OrchestratorError::Step(err)),
            }
        }

        Ok(RunOutcome::Completed)
    }

    async fn persist_pause(&self, completed: &HashSet<String>) {
        let record = ImportProgressRecord {
            completed_steps: completed.clone(),
            deferred_operations: HashSet::new(),
        };
        self.progress.save_progress(&record).await;
        self.dialog
            .notify("Import paused; it will resume from where it left off.", NoticeLevel::Info)
            .await;
        self.config.event_listeners.emit(&OrchestratorEvent::RunPaused {
            pattern_name: self.config.name.clone(),
            timestamp: Instant::now(),
            completed_steps: completed.len(),
        });
    }

    /// Refreshes the active-import heartbeat on its own schedule rather
    /// than weaving it into the synchronous `cancel_check` closure the
    /// pagination engine and delta import expect — a design
    /// choice recorded in DESIGN.md.
    fn spawn_heartbeat_task(&self) -> tokio::task::JoinHandle<()>
    where
        P: 'static,
        C: 'static,
    {
        let progress = Arc::clone(&self.progress);
        let interval = self.heartbeat_interval();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await; // first tick fires immediately; skip it
            loop {
                ticker.tick().await;
                progress.heartbeat().await;
            }
        })
    }

    fn heartbeat_interval(&self) -> std::time::Duration {
        // Mirrors ACTIVE_IMPORT_HEARTBEAT_MS; exposed via ProgressConfig
        // rather than duplicated here.
        self.progress.heartbeat_interval()
    }
}
