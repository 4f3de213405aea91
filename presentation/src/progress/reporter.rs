//! Progress reporting for cycle execution

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use planqa_application::PipelineProgressNotifier;
use planqa_domain::Stage;
use std::sync::Mutex;
use std::time::Duration;

/// Reports progress during a cycle with a spinner per stage and a bar for retrieval
pub struct ProgressReporter {
    multi: MultiProgress,
    stage_bar: Mutex<Option<ProgressBar>>,
    retrieval_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            stage_bar: Mutex::new(None),
            retrieval_bar: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn retrieval_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("  {prefix:.bold} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn stage_label(stage: Stage) -> String {
        let step = Stage::all()
            .iter()
            .position(|s| *s == stage)
            .map_or(0, |i| i + 1);
        format!("[{}/4] {}", step, stage.display_name())
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineProgressNotifier for ProgressReporter {
    fn on_stage_start(&self, stage: Stage) {
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(Self::spinner_style());
        pb.set_prefix(Self::stage_label(stage));
        pb.set_message("running...");
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut slot) = self.stage_bar.lock() {
            *slot = Some(pb);
        }
    }

    fn on_retrieval_start(&self, sub_questions: usize) {
        let pb = self.multi.add(ProgressBar::new(sub_questions as u64));
        pb.set_style(Self::retrieval_style());
        pb.set_prefix("searches");

        if let Ok(mut slot) = self.retrieval_bar.lock() {
            *slot = Some(pb);
        }
    }

    fn on_sub_question_complete(&self, _index: usize, sub_question: &str, success: bool) {
        if let Ok(slot) = self.retrieval_bar.lock()
            && let Some(pb) = slot.as_ref()
        {
            let status = if success {
                format!("{} {}", "v".green(), sub_question)
            } else {
                format!("{} {}", "x".red(), sub_question)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_stage_complete(&self, stage: Stage) {
        if stage == Stage::Retrieval
            && let Ok(mut slot) = self.retrieval_bar.lock()
            && let Some(pb) = slot.take()
        {
            pb.finish_and_clear();
        }
        if let Ok(mut slot) = self.stage_bar.lock()
            && let Some(pb) = slot.take()
        {
            pb.finish_with_message(format!("{}", "done".green()));
        }
    }

    fn on_stage_failed(&self, _stage: Stage, reason: &str) {
        if let Ok(mut slot) = self.retrieval_bar.lock()
            && let Some(pb) = slot.take()
        {
            pb.abandon();
        }
        if let Ok(mut slot) = self.stage_bar.lock()
            && let Some(pb) = slot.take()
        {
            pb.abandon_with_message(format!("{} {}", "failed:".red(), reason));
        }
    }
}
