use crate::ui;
use std::time::{Duration, Instant};

/// Step-by-step progress output for a release flow
pub struct ProgressTracker {
    flow_name: String,
    start_time: Instant,
    steps: Vec<String>,
    current_step: usize,
    verbose: bool,
}

impl ProgressTracker {
    /// Start tracking a flow, printing its section header
    pub fn new(flow_name: &str, verbose: bool) -> Self {
        ui::section_header(flow_name);
        Self {
            flow_name: flow_name.to_string(),
            start_time: Instant::now(),
            steps: Vec::new(),
            current_step: 0,
            verbose,
        }
    }

    pub fn with_steps(mut self, steps: &[&str]) -> Self {
        self.steps = steps.iter().map(|step| step.to_string()).collect();
        self
    }

    /// Announce the next step
    pub fn start_step(&self) {
        if let Some(step) = self.steps.get(self.current_step) {
            ui::status_message(step);
        }
    }

    /// Extra diagnostics for the running step, shown with `--verbose`
    pub fn detail(&self, message: &str) {
        ui::verbose_message(self.verbose, message);
    }

    pub fn complete_step(&mut self) {
        if let Some(step) = self.steps.get(self.current_step) {
            ui::success_message(step);
            self.current_step += 1;
        }
    }

    pub fn skip_step(&mut self, reason: &str) {
        if let Some(step) = self.steps.get(self.current_step) {
            ui::warning_message(&format!("Skipped: {} ({})", step, reason));
            self.current_step += 1;
        }
    }

    /// Finish the flow, reporting how long it took
    pub fn complete(&self) {
        let elapsed = self.start_time.elapsed();
        ui::success_message(&format!(
            "{} completed in {}",
            self.flow_name,
            Self::format_duration(elapsed)
        ));
    }

    fn format_duration(duration: Duration) -> String {
        let seconds = duration.as_secs();
        if seconds < 60 {
            format!("{seconds} seconds")
        } else if seconds < 3600 {
            format!(
                "{} minutes {seconds_remainder} seconds",
                seconds / 60,
                seconds_remainder = seconds % 60
            )
        } else {
            format!(
                "{hours} hours {minutes} minutes",
                hours = seconds / 3600,
                minutes = (seconds % 3600) / 60
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_advance_and_stop_at_end() {
        let mut progress = ProgressTracker::new("Test", false).with_steps(&["one", "two"]);
        progress.start_step();
        progress.complete_step();
        progress.skip_step("not needed");
        progress.complete_step();
        assert_eq!(progress.current_step, 2);
    }

    #[test]
    fn durations_are_human_readable() {
        assert_eq!(ProgressTracker::format_duration(Duration::from_secs(5)), "5 seconds");
        assert_eq!(
            ProgressTracker::format_duration(Duration::from_secs(125)),
            "2 minutes 5 seconds"
        );
        assert_eq!(
            ProgressTracker::format_duration(Duration::from_secs(7260)),
            "2 hours 1 minutes"
        );
    }
}
