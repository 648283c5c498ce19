//! Progress notification port
//!
//! Defines the interface for reporting progress during a deliberation.

use council_domain::{ProviderModelRef, Stage};

/// Callback for progress updates during a deliberation
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (progress bars, plain log lines, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called when a stage starts with the number of calls it will make
    fn on_stage_start(&self, stage: Stage, total: usize);

    /// Called when one member's call finishes within a stage
    fn on_member_complete(&self, stage: Stage, model: &ProviderModelRef, succeeded: bool);

    /// Called when a stage completes
    fn on_stage_complete(&self, stage: Stage);

    /// Called instead of start/complete when a stage does not run
    fn on_stage_skipped(&self, _stage: Stage, _reason: &str) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_stage_start(&self, _stage: Stage, _total: usize) {}
    fn on_member_complete(&self, _stage: Stage, _model: &ProviderModelRef, _succeeded: bool) {}
    fn on_stage_complete(&self, _stage: Stage) {}
}
