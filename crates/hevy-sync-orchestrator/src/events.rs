//! Events emitted by the import orchestrator.

use hevy_sync_core::ResilienceEvent;
use std::time::Instant;

#[derive(Debug, Clone)]
pub enum OrchestratorEvent {
    StepStarted {
        pattern_name: String,
        timestamp: Instant,
        step: &'static str,
    },
    StepCompleted {
        pattern_name: String,
        timestamp: Instant,
        step: &'static str,
    },
    RunPaused {
        pattern_name: String,
        timestamp: Instant,
        completed_steps: usize,
    },
    RunCompleted {
        pattern_name: String,
        timestamp: Instant,
    },
    AlreadyInProgress {
        pattern_name: String,
        timestamp: Instant,
    },
    ReauthRequired {
        pattern_name: String,
        timestamp: Instant,
        step: &'static str,
    },
}

impl ResilienceEvent for OrchestratorEvent {
    fn event_type(&self) -> &'static str {
        match self {
            OrchestratorEvent::StepStarted { .. } => "step_started",
            OrchestratorEvent::StepCompleted { .. } => "step_completed",
            OrchestratorEvent::RunPaused { .. } => "run_paused",
            OrchestratorEvent::RunCompleted { .. } => "run_completed",
            OrchestratorEvent::AlreadyInProgress { .. } => "already_in_progress",
            OrchestratorEvent::ReauthRequired { .. } => "reauth_required",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            OrchestratorEvent::StepStarted { timestamp, .. }
            | OrchestratorEvent::StepCompleted { timestamp, .. }
            | OrchestratorEvent::RunPaused { timestamp, .. }
            | OrchestratorEvent::RunCompleted { timestamp, .. }
            | OrchestratorEvent::AlreadyInProgress { timestamp, .. }
            | OrchestratorEvent::ReauthRequired { timestamp, .. } => *timestamp,
        }
    }

    fn pattern_name(&self) -> &str {
        match self {
            OrchestratorEvent::StepStarted { pattern_name, .. }
            | OrchestratorEvent::StepCompleted { pattern_name, .. }
            | OrchestratorEvent::RunPaused { pattern_name, .. }
            | OrchestratorEvent::RunCompleted { pattern_name, .. }
            | OrchestratorEvent::AlreadyInProgress { pattern_name, .. }
            | OrchestratorEvent::ReauthRequired { pattern_name, .. } => pattern_name,
        }
    }
}
