//! Progress reporting for turn execution

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use swarm_application::TurnProgressNotifier;
use swarm_domain::{
    ClarificationRequest, DocumentId, OutputVerdict, Plan, PlanVerdict, Task, TurnPhase,
};

/// Reports progress with a spinner per phase and a bar for task fan-out
pub struct ProgressReporter {
    multi: MultiProgress,
    phase_bar: Mutex<Option<ProgressBar>>,
    task_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            phase_bar: Mutex::new(None),
            task_bar: Mutex::new(None),
        }
    }

    fn task_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn slot(bar: &Mutex<Option<ProgressBar>>) -> MutexGuard<'_, Option<ProgressBar>> {
        bar.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn finish_phase(&self) {
        if let Some(pb) = Self::slot(&self.phase_bar).take() {
            pb.finish_and_clear();
        }
    }

    fn println(&self, line: String) {
        let _ = self.multi.println(line);
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnProgressNotifier for ProgressReporter {
    fn on_phase_change(&self, phase: &TurnPhase) {
        self.finish_phase();
        if let Some(pb) = Self::slot(&self.task_bar).take() {
            pb.finish_and_clear();
        }

        match phase {
            TurnPhase::Done => {}
            TurnPhase::Cancelled => self.println(format!("{} {}", "!".yellow(), "Stopped".yellow())),
            TurnPhase::Failed => self.println(format!("{} {}", "x".red(), "Turn failed".red())),
            _ => {
                let pb = self.multi.add(ProgressBar::new_spinner());
                pb.set_style(Self::spinner_style());
                pb.set_prefix(phase.display_name().to_string());
                pb.enable_steady_tick(Duration::from_millis(100));
                *Self::slot(&self.phase_bar) = Some(pb);
            }
        }
    }

    fn on_document_briefed(&self, document: &DocumentId, success: bool) {
        if success {
            self.println(format!("  {} briefed {}", "v".green(), document));
        } else {
            self.println(format!("  {} could not brief {}", "x".red(), document));
        }
    }

    fn on_clarification_requested(&self, request: &ClarificationRequest) {
        self.finish_phase();
        self.println(format!(
            "{} {} clarifying question(s)",
            "?".yellow(),
            request.questions.len()
        ));
    }

    fn on_plan_proposed(&self, round: usize, plan: &Plan) {
        if let Some(pb) = Self::slot(&self.phase_bar).as_ref() {
            pb.set_message(format!(
                "round {}: {} plan, {} task(s)",
                round,
                plan.plan_type,
                plan.task_count()
            ));
        }
    }

    fn on_plan_verdict(&self, round: usize, verdict: &PlanVerdict) {
        let mark = if verdict.is_approved() {
            "v".green()
        } else {
            "x".red()
        };
        self.println(format!(
            "  {} plan review round {}: {}",
            mark,
            round,
            verdict.critique.dimmed()
        ));
    }

    fn on_execution_start(&self, task_count: usize) {
        self.finish_phase();
        let pb = self.multi.add(ProgressBar::new(task_count as u64));
        pb.set_style(Self::task_style());
        pb.set_prefix(TurnPhase::Execute.display_name().to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        *Self::slot(&self.task_bar) = Some(pb);
    }

    fn on_task_start(&self, task: &Task) {
        if let Some(pb) = Self::slot(&self.task_bar).as_ref() {
            pb.set_message(format!("asking {}", task.document));
        }
    }

    fn on_task_complete(&self, task: &Task, success: bool) {
        if let Some(pb) = Self::slot(&self.task_bar).as_ref() {
            let status = if success {
                format!("{} {}", "v".green(), task.document)
            } else {
                format!("{} {}", "x".red(), task.document)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_audit_verdict(&self, attempt: usize, verdict: &OutputVerdict) {
        let mark = if verdict.is_approved() {
            "v".green()
        } else {
            "x".red()
        };
        self.println(format!(
            "  {} audit {}: {}",
            mark,
            attempt,
            verdict.quality.dimmed()
        ));
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl TurnProgressNotifier for SimpleProgress {
    fn on_phase_change(&self, phase: &TurnPhase) {
        if !phase.is_terminal() {
            println!("{} {}", "->".cyan(), phase.display_name().bold());
        }
    }

    fn on_document_briefed(&self, document: &DocumentId, success: bool) {
        if success {
            println!("  {} {}", "v".green(), document);
        } else {
            println!("  {} {} (failed)", "x".red(), document);
        }
    }

    fn on_plan_verdict(&self, round: usize, verdict: &PlanVerdict) {
        println!("  round {}: {}", round, verdict.outcome.as_str());
    }

    fn on_execution_start(&self, task_count: usize) {
        println!("  {} task(s)", task_count);
    }

    fn on_task_complete(&self, task: &Task, success: bool) {
        if success {
            println!("  {} {}", "v".green(), task.document);
        } else {
            println!("  {} {} (failed)", "x".red(), task.document);
        }
    }

    fn on_audit_verdict(&self, attempt: usize, verdict: &OutputVerdict) {
        println!("  audit {}: {}", attempt, verdict.outcome.as_str());
    }
}
