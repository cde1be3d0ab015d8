use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner shown while a request to the cluster is in flight.
pub struct ProgressTracker {
    pub progress_bar: ProgressBar,
}

impl ProgressTracker {
    pub fn new_spinner(description: &str) -> Self {
        let progress_bar = ProgressBar::new_spinner();

        let template = "[{elapsed_precise}] {spinner} {msg}";
        if let Ok(style) = ProgressStyle::with_template(template) {
            progress_bar.set_style(style.tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "));
        }

        progress_bar.set_message(description.to_string());
        progress_bar.enable_steady_tick(Duration::from_millis(100));

        Self { progress_bar }
    }

    /// Removes the spinner line, leaving the terminal to the caller's output.
    pub fn finish_and_clear(&self) {
        self.progress_bar.finish_and_clear();
    }
}
