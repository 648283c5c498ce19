//! Progress reporting for deliberation runs

use colored::Colorize;
use council_application::ports::progress::{NoProgress, ProgressNotifier};
use council_domain::{ProviderModelRef, Stage};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// How stage progress is shown on stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMode {
    /// Nothing is printed (`--quiet`)
    Silent,
    /// Live indicatif bars for an interactive terminal
    Bars,
    /// One line per event, for pipes and log captures
    Lines,
}

impl ProgressMode {
    /// Pick a mode from the quiet flag and whether stderr is a terminal.
    pub fn select(quiet: bool, stderr_is_terminal: bool) -> Self {
        match (quiet, stderr_is_terminal) {
            (true, _) => Self::Silent,
            (false, true) => Self::Bars,
            (false, false) => Self::Lines,
        }
    }

    pub fn notifier(self) -> Box<dyn ProgressNotifier> {
        match self {
            Self::Silent => Box::new(NoProgress),
            Self::Bars => Box::new(ProgressReporter::new()),
            Self::Lines => Box::new(SimpleProgress),
        }
    }
}

/// Reports progress during a deliberation with progress bars
pub struct ProgressReporter {
    multi: MultiProgress,
    stage_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            stage_bar: Mutex::new(None),
        }
    }

    fn stage_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .map(|style| style.progress_chars("=>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
    }

    fn stage_bar(&self) -> MutexGuard<'_, Option<ProgressBar>> {
        self.stage_bar
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn stage_title(stage: Stage) -> String {
        format!("Stage {}: {}", stage.number(), stage.display_name())
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_stage_start(&self, stage: Stage, total: usize) {
        let pb = self.multi.add(ProgressBar::new(total as u64));
        pb.set_style(Self::stage_style());
        pb.set_prefix(Self::stage_title(stage));
        pb.set_message("Starting...");

        *self.stage_bar() = Some(pb);
    }

    fn on_member_complete(&self, _stage: Stage, model: &ProviderModelRef, succeeded: bool) {
        if let Some(pb) = self.stage_bar().as_ref() {
            let status = if succeeded {
                format!("{} {}", "v".green(), model.short_name())
            } else {
                format!("{} {}", "x".red(), model.short_name())
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_stage_complete(&self, stage: Stage) {
        if let Some(pb) = self.stage_bar().take() {
            pb.finish_with_message(format!("Stage {} complete", stage.number()).green().to_string());
        }
    }

    fn on_stage_skipped(&self, stage: Stage, reason: &str) {
        let pb = self.multi.add(ProgressBar::new(0));
        pb.set_style(Self::stage_style());
        pb.set_prefix(Self::stage_title(stage));
        pb.finish_with_message(format!("skipped: {}", reason).yellow().to_string());
    }
}

/// Simple text-based progress (no fancy UI), written to stderr
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_stage_start(&self, stage: Stage, total: usize) {
        eprintln!(
            "{} {} ({} calls)",
            "->".cyan(),
            ProgressReporter::stage_title(stage).bold(),
            total
        );
    }

    fn on_member_complete(&self, _stage: Stage, model: &ProviderModelRef, succeeded: bool) {
        if succeeded {
            eprintln!("  {} {}", "v".green(), model);
        } else {
            eprintln!("  {} {} (failed)", "x".red(), model);
        }
    }

    fn on_stage_complete(&self, _stage: Stage) {
        eprintln!();
    }

    fn on_stage_skipped(&self, stage: Stage, reason: &str) {
        eprintln!(
            "{} {} {}",
            "->".cyan(),
            ProgressReporter::stage_title(stage).bold(),
            format!("skipped: {}", reason).yellow()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_mode_selection() {
        assert_eq!(ProgressMode::select(true, true), ProgressMode::Silent);
        assert_eq!(ProgressMode::select(true, false), ProgressMode::Silent);
        assert_eq!(ProgressMode::select(false, true), ProgressMode::Bars);
        assert_eq!(ProgressMode::select(false, false), ProgressMode::Lines);
    }

    #[test]
    fn test_line_progress_handles_every_event() {
        let progress = ProgressMode::Lines.notifier();
        let model = ProviderModelRef::parse("vendor/alpha").unwrap();

        progress.on_stage_start(Stage::Opinions, 1);
        progress.on_member_complete(Stage::Opinions, &model, false);
        progress.on_stage_complete(Stage::Opinions);
        progress.on_stage_skipped(Stage::Review, "no opinions to review");
    }

    #[test]
    fn test_stage_title() {
        assert_eq!(
            ProgressReporter::stage_title(Stage::Review),
            "Stage 2: Anonymous Cross-Review"
        );
    }

    #[test]
    fn test_bar_lifecycle() {
        let reporter = ProgressReporter::new();
        let model = ProviderModelRef::parse("vendor/alpha:free").unwrap();

        reporter.on_stage_start(Stage::Opinions, 2);
        reporter.on_member_complete(Stage::Opinions, &model, true);
        reporter.on_member_complete(Stage::Opinions, &model, false);
        assert_eq!(reporter.stage_bar().as_ref().map(|pb| pb.position()), Some(2));

        reporter.on_stage_complete(Stage::Opinions);
        assert!(reporter.stage_bar().is_none());
    }

    #[test]
    fn test_member_without_stage_is_ignored() {
        let reporter = ProgressReporter::default();
        let model = ProviderModelRef::parse("vendor/alpha").unwrap();
        reporter.on_member_complete(Stage::Review, &model, true);
        reporter.on_stage_skipped(Stage::Review, "no usable opinions");
        assert!(reporter.stage_bar().is_none());
    }
}
